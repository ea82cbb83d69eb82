use crate::error::{Result, SheetError};
use cellgraph_engine::engine::{Position, Value};
use rustc_hash::FxHashSet;
use tracing::debug;

use super::state::check_position;
use super::{Content, Sheet};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// The edit is all or nothing: a syntax error or a circular reference
    /// returns an error and leaves every cell, edge and cached value as it was.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        check_position(pos)?;

        let content = Content::from_input(text, &self.engine).inspect_err(|e| {
            debug!(cell = %pos, error = %e, "rejected edit");
        })?;

        let references: FxHashSet<Position> = content
            .referenced_cells()
            .into_iter()
            .filter(Position::is_valid)
            .collect();

        if let Some(path) = self.detect_cycle(pos, &references) {
            let err = SheetError::CircularDependency { cell: pos, path };
            debug!(cell = %pos, error = %err, "rejected edit");
            return Err(err);
        }

        self.get_or_create(pos).content = content;
        self.relink(pos, references);
        let invalidated = self.invalidate_from(pos);

        debug!(
            cell = %pos,
            references = self.cells[&pos].outgoing.len(),
            invalidated,
            "committed edit"
        );
        Ok(())
    }

    /// Clear the cell at `pos`.
    ///
    /// Behaves like `set_cell(pos, "")`: edges are dropped and dependents are
    /// invalidated. The cell is then removed from the store unless other cells
    /// still reference it.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        check_position(pos)?;
        if !self.cells.contains_key(&pos) {
            return Ok(());
        }

        self.set_cell(pos, "")?;

        if self.cells.get(&pos).is_some_and(|cell| !cell.is_referenced()) {
            self.cells.remove(&pos);
            debug!(cell = %pos, "pruned empty cell");
        }
        Ok(())
    }

    /// Replace the outgoing edges of `pos` and mirror the change into the
    /// incoming sets of the old and new neighbours.
    fn relink(&mut self, pos: Position, references: FxHashSet<Position>) {
        let old = std::mem::take(&mut self.get_or_create(pos).outgoing);
        for dep in old {
            self.get_or_create(dep).incoming.remove(&pos);
        }

        for &dep in &references {
            self.get_or_create(dep).incoming.insert(pos);
        }
        self.get_or_create(pos).outgoing = references;
    }

    /// Clear the memoized value of `origin` and of every cell that depends on
    /// it, directly or transitively. Returns how many cached values were
    /// dropped.
    ///
    /// A cached value is only ever stored once all of its precedents are
    /// cached, so an uncached cell has no cached dependents and the walk
    /// stops there.
    fn invalidate_from(&mut self, origin: Position) -> usize {
        let mut to_process = vec![origin];
        let mut visited = FxHashSet::default();
        let mut invalidated = 0;

        while let Some(pos) = to_process.pop() {
            if !visited.insert(pos) {
                continue;
            }
            if let Some(cell) = self.cells.get_mut(&pos) {
                if cell.invalidate() {
                    invalidated += 1;
                } else if pos != origin {
                    continue;
                }
                to_process.extend(cell.incoming.iter().copied());
            }
        }

        invalidated
    }

    /// Current memoized value at `pos`, without computing anything.
    pub fn cached_value(&self, pos: Position) -> Option<&Value> {
        self.cells.get(&pos).and_then(|cell| cell.cached_value())
    }
}
