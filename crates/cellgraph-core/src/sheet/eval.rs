use crate::error::Result;
use cellgraph_engine::engine::{CellLookup, Position, Value};
use rustc_hash::FxHashSet;
use tracing::trace;

use super::state::check_position;
use super::{Cell, Sheet};

impl Sheet {
    /// Get the value at `pos`. Absent cells read as empty text.
    pub fn value(&self, pos: Position) -> Result<Value> {
        check_position(pos)?;
        Ok(self
            .cells
            .get(&pos)
            .map(|cell| self.evaluate(pos, cell))
            .unwrap_or_default())
    }

    /// Get the editable text at `pos`.
    pub fn text(&self, pos: Position) -> Result<String> {
        check_position(pos)?;
        Ok(self.cells.get(&pos).map(Cell::text).unwrap_or_default())
    }

    /// Valid positions referenced by the cell at `pos`, sorted and deduplicated.
    pub fn referenced_cells(&self, pos: Position) -> Result<Vec<Position>> {
        check_position(pos)?;
        Ok(self
            .cells
            .get(&pos)
            .map(Cell::referenced_cells)
            .unwrap_or_default())
    }

    /// True if the cell at `pos` reads or is read by another cell.
    pub fn is_referenced(&self, pos: Position) -> Result<bool> {
        check_position(pos)?;
        Ok(self.cells.get(&pos).is_some_and(Cell::is_referenced))
    }

    /// Return the memoized value, computing and storing it on a miss.
    ///
    /// Uncached precedents are filled first, deepest first, so the formula
    /// finds every operand cached and evaluation never nests more than one
    /// level deep however long the reference chain is.
    fn evaluate(&self, pos: Position, cell: &Cell) -> Value {
        if let Some(value) = cell.cache.get() {
            return value.clone();
        }
        self.fill_precedents(pos);
        cell.cache.get_or_init(|| self.compute(pos, cell)).clone()
    }

    /// Post-order walk over the outgoing edges of `root`, filling the cache
    /// of every uncached precedent. `root` itself is left to the caller.
    fn fill_precedents(&self, root: Position) {
        let mut visited: FxHashSet<Position> = FxHashSet::default();
        // (position, children already pushed)
        let mut stack = vec![(root, false)];

        while let Some((pos, expanded)) = stack.pop() {
            let Some(cell) = self.cells.get(&pos) else {
                continue;
            };
            if cell.cache.get().is_some() {
                continue;
            }

            if expanded {
                if pos != root {
                    cell.cache.get_or_init(|| self.compute(pos, cell));
                }
                continue;
            }

            if !visited.insert(pos) {
                continue;
            }
            stack.push((pos, true));
            stack.extend(
                cell.outgoing()
                    .filter(|dep| !visited.contains(dep))
                    .map(|dep| (dep, false)),
            );
        }
    }

    fn compute(&self, pos: Position, cell: &Cell) -> Value {
        trace!(cell = %pos, "cache miss");
        self.evaluations.set(self.evaluations.get() + 1);
        cell.content.value(self)
    }
}

impl CellLookup for Sheet {
    fn cell_value(&self, pos: Position) -> Option<Value> {
        self.cells.get(&pos).map(|cell| self.evaluate(pos, cell))
    }
}
