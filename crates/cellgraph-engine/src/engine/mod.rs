//! Formula engine API.
//!
//! This module provides everything the cell graph consumes from outside:
//!
//! - [`Position`] - Cell identity (A1 notation ↔ row/col indices)
//! - [`Value`], [`EvalError`] - Observable cell results
//! - [`extract_references`] - Find cell references in an expression
//! - [`FormulaEngine`], [`Formula`] - Parse and evaluate Rhai formulas
//! - [`FormulaConfig`] - Engine resource limits
//! - [`float_literals`] - Compile integer literals as floats
//! - [`format_number`] - Format numbers for display

mod config;
mod deps;
mod eval;
mod format;
mod position;
mod preprocess;
mod value;

pub use config::FormulaConfig;
pub use deps::{Reference, extract_dependencies, extract_references};
pub use eval::{CellLookup, Formula, FormulaEngine, FormulaError, create_engine};
pub use format::format_number;
pub use position::Position;
pub use preprocess::float_literals;
pub use value::{EvalError, Value};
