use crate::cli::Cli;
use crate::commands::{CommandError, Result};
use crate::output::{get_terminal_width, render, OutputFormat, RenderOptions};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use tiq_core::config::Settings;
use tiq_core::federated::CONFIG_SOURCE;
use tiq_core::{build_registry, FederatedSearch, ResultSet};
use tracing::info;

/// Run one lookup and print the report. Returns the process exit code.
pub async fn run(cli: &Cli, settings: Settings) -> Result<i32> {
    let query = cli.query.trim();
    if query.is_empty() {
        return Err(CommandError::InvalidInput(
            "The indicator must not be empty. Usage: tiq <query>".to_string(),
        ));
    }

    let settings = match cli.timeout {
        Some(secs) => settings.with_timeout(Duration::from_secs(secs)),
        None => settings,
    };

    let registry = build_registry(&settings)?;

    info!("Searching for indicator: {}", query);
    let results = FederatedSearch::new(&registry).search(query).await;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let color = use_color(cli);
    let options = RenderOptions {
        color,
        width: Some(get_terminal_width()),
    };
    println!("{}", render(&results, format, options)?);

    if format == OutputFormat::Table {
        print_missing_key_hint(&settings, &results, color);
    }

    Ok(exit_code(&results))
}

/// 0 only when every source answered successfully.
pub fn exit_code(results: &ResultSet) -> i32 {
    if results.is_empty() || results.has_errors() {
        1
    } else {
        0
    }
}

fn use_color(cli: &Cli) -> bool {
    !cli.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn print_missing_key_hint(settings: &Settings, results: &ResultSet, color: bool) {
    if results.get(CONFIG_SOURCE).is_none() {
        return;
    }
    let missing = settings.missing_keys();
    if missing.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("Please set the following environment variables:");
    for key in missing {
        if color {
            eprintln!("  - {}", key.yellow());
        } else {
            eprintln!("  - {}", key);
        }
    }
}
