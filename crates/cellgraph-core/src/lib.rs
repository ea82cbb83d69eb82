//! cellgraph-core - Cell contents, the live reference graph and the value cache.
//!
//! A [`Sheet`] owns every cell. Editing a cell parses its new content, rejects
//! the edit if it would close a reference cycle, rewires the edges on both
//! ends, and clears the memoized value of the cell and of everything that
//! depends on it.

pub mod error;
pub mod sheet;

pub use error::{Result, SheetError};
pub use sheet::{Cell, Content, Sheet, Size};

pub use cellgraph_engine::engine::{EvalError, FormulaConfig, FormulaEngine, Position, Value};
