pub mod search;

use owo_colors::OwoColorize;
use std::future::Future;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Core library error: {0}")]
    Core(#[from] tiq_core::error::SourceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Runs a command on its own task and turns its outcome into an exit code.
///
/// A command error or a panic anywhere in the command (rendering included)
/// is logged and reported as exit code 1.
pub async fn run_guarded<F>(command: F) -> i32
where
    F: Future<Output = Result<i32>> + Send + 'static,
{
    match tokio::spawn(command).await {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            error!("An unexpected error occurred: {}", e);
            eprintln!("{}: {}", "Error".red().bold(), e);
            1
        }
        Err(join_err) => {
            error!("An unexpected error occurred: {}", join_err);
            eprintln!("{}: unexpected internal failure", "Error".red().bold());
            1
        }
    }
}
