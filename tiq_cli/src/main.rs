use clap::Parser;
use std::process;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::Cli;
use commands::{run_guarded, search};
use tiq_core::config::Settings;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging. Logs go to stderr so JSON on stdout stays clean.
    let default_filter = match cli.verbose {
        0 => "tiq_cli=info,tiq_core=info",
        1 => "tiq_cli=debug,tiq_core=debug",
        _ => "tiq_cli=trace,tiq_core=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Could not load .env file: {}", e);
        }
    }

    let settings = Settings::from_env();

    let code = run_guarded(async move { search::run(&cli, settings).await }).await;

    process::exit(code);
}
