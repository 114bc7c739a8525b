use crate::commands::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use tiq_core::federated::{Outcome, SourceResult};
use tiq_core::ResultSet;

pub const TABLE_TITLE: &str = "Threat Intelligence Results";

/// Output mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    pub width: Option<u16>,
}

pub fn get_terminal_width() -> u16 {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0)
        .unwrap_or(100)
}

pub fn render(results: &ResultSet, format: OutputFormat, options: RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(results),
        OutputFormat::Table => Ok(render_table(results, options)),
    }
}

/// The result set as a pretty-printed JSON array. Never colored.
pub fn render_json(results: &ResultSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

pub fn render_table(results: &ResultSet, options: RenderOptions) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Source", "Status", "Details"]);
    if let Some(width) = options.width {
        table.set_width(width);
    }

    for result in results {
        table.add_row(vec![
            paint_source(result.source(), options.color),
            paint_status(result, options.color),
            details(result),
        ]);
    }

    let title = if options.color {
        TABLE_TITLE.bold().to_string()
    } else {
        TABLE_TITLE.to_string()
    };
    format!("{}\n{}", title, table)
}

fn paint_source(source: &str, color: bool) -> String {
    if color {
        source.cyan().to_string()
    } else {
        source.to_string()
    }
}

fn paint_status(result: &SourceResult, color: bool) -> String {
    let label = result.status().as_str();
    match (color, result.is_success()) {
        (false, _) => label.to_string(),
        (true, true) => label.green().to_string(),
        (true, false) => label.red().to_string(),
    }
}

fn details(result: &SourceResult) -> String {
    match result.outcome() {
        Outcome::Success { data } => {
            serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
        }
        Outcome::Error { error } => error.clone(),
    }
}
