//! Error types for cellgraph core.

use thiserror::Error;

use cellgraph_engine::engine::{FormulaError, Position};

/// Errors raised by sheet mutations. A failed edit leaves the sheet as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Invalid position: ({}, {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error(transparent)]
    Syntax(#[from] FormulaError),

    #[error("Circular dependency detected: {}", format_path(.path))]
    CircularDependency { cell: Position, path: Vec<Position> },
}

fn format_path(path: &[Position]) -> String {
    path.iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, SheetError>;
