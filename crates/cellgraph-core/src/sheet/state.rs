use crate::error::{Result, SheetError};
use cellgraph_engine::engine::{FormulaEngine, Position};
use rustc_hash::FxHashMap;
use std::cell::Cell as Counter;

use super::Cell;

/// The cell store. Owns every [`Cell`], addressed by [`Position`]; cells refer
/// to each other only by position.
///
/// Single-threaded: all mutation goes through `&mut self`, and reads only
/// ever fill memo caches.
pub struct Sheet {
    pub(crate) cells: FxHashMap<Position, Cell>,
    pub(crate) engine: FormulaEngine,
    /// Content evaluations performed on cache misses.
    pub(crate) evaluations: Counter<u64>,
}

impl Sheet {
    /// Create an empty sheet with a default formula engine.
    pub fn new() -> Self {
        Self::with_engine(FormulaEngine::new())
    }

    pub fn with_engine(engine: FormulaEngine) -> Self {
        Sheet {
            cells: FxHashMap::default(),
            engine,
            evaluations: Counter::new(0),
        }
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    /// Look up the cell at `pos`, if one has been materialized.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>> {
        check_position(pos)?;
        Ok(self.cells.get(&pos))
    }

    /// Number of materialized cells (including empty ones kept alive by references).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of content evaluations performed so far. Cache hits do not count.
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.get()
    }

    /// The cell at `pos`, materializing an empty one first if needed.
    pub(crate) fn get_or_create(&mut self, pos: Position) -> &mut Cell {
        debug_assert!(pos.is_valid());
        self.cells.entry(pos).or_insert_with(Cell::new_empty)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_position(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}
