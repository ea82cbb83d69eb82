//! Sheet state and logic: the cell store, its dependency graph and value cache.

mod cell;
mod cycle;
mod eval;
mod ops;
mod print;
mod state;

pub use cell::{Cell, Content, ESCAPE_SIGN, FORMULA_SIGN};
pub use print::Size;
pub use state::Sheet;
