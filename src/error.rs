//! Error types for the cellgraph command runner

use cellgraph_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running a command script
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {source}")]
    Sheet { line: usize, source: SheetError },
}

pub type Result<T> = std::result::Result<T, CliError>;
