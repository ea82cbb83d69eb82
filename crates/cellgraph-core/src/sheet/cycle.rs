//! Circular dependency detection for prospective edits.
//!
//! Before a formula is committed we verify that the references it would add
//! cannot reach back to the edited cell. The search walks the committed
//! outgoing edges with an explicit stack, visiting each cell at most once.

use rustc_hash::{FxHashMap, FxHashSet};

use cellgraph_engine::engine::Position;

use super::Sheet;

impl Sheet {
    /// Check whether giving `target` the outgoing references `candidate` would
    /// close a cycle. Returns the cycle as a path that starts and ends at
    /// `target`, or `None` if the edit is safe.
    ///
    /// Cells that do not exist yet have no outgoing edges and end the search
    /// along that branch; nothing is materialized.
    pub(crate) fn detect_cycle(
        &self,
        target: Position,
        candidate: &FxHashSet<Position>,
    ) -> Option<Vec<Position>> {
        if candidate.contains(&target) {
            return Some(vec![target, target]);
        }

        // Doubles as the visited set.
        let mut parent: FxHashMap<Position, Position> = FxHashMap::default();
        let mut stack = Vec::new();

        let mut roots: Vec<Position> = candidate
            .iter()
            .copied()
            .filter(Position::is_valid)
            .collect();
        roots.sort_unstable();
        for root in roots.into_iter().rev() {
            parent.insert(root, target);
            stack.push(root);
        }

        while let Some(current) = stack.pop() {
            let Some(cell) = self.cells.get(&current) else {
                continue;
            };

            let mut next: Vec<Position> = cell.outgoing().collect();
            next.sort_unstable();
            for dep in next.into_iter().rev() {
                if dep == target {
                    return Some(cycle_path(&parent, target, current));
                }
                if dep.is_valid() && !parent.contains_key(&dep) {
                    parent.insert(dep, current);
                    stack.push(dep);
                }
            }
        }

        None
    }
}

/// Rebuild `target -> ... -> last -> target` from the parent links.
fn cycle_path(
    parent: &FxHashMap<Position, Position>,
    target: Position,
    last: Position,
) -> Vec<Position> {
    let mut path = vec![target, last];
    let mut current = last;
    while let Some(&prev) = parent.get(&current) {
        path.push(prev);
        if prev == target {
            break;
        }
        current = prev;
    }
    path.reverse();
    path
}
