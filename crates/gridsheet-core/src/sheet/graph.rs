//! Dependency graph maintenance.
//!
//! Every cell stores its outgoing edges (`depends_on`). Incoming edges live in
//! the sheet's `dependents` map, keyed by position, so they survive the target
//! being cleared. The helpers here are the only code that mutates either
//! side, so both directions always change together.
//!
//! All walks use an explicit stack and a visited set, so long reference
//! chains cannot overflow the call stack.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use gridsheet_engine::engine::Position;
use tracing::trace;

use super::Sheet;
use crate::cell::{Cell, Content};

impl Sheet {
    /// Check whether making `target` read `refs` would close a cycle.
    ///
    /// Walks forward from `refs` over the committed formulas of the cells it
    /// reaches. `target`'s own current edges are never followed: reaching
    /// `target` at all means the new edges would form a cycle. Returns the
    /// cycle as a path starting and ending at `target`.
    pub(crate) fn find_cycle(&self, target: Position, refs: &[Position]) -> Option<Vec<Position>> {
        // Doubles as the visited set: every discovered cell maps to the cell
        // it was discovered from.
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut stack = Vec::new();

        for &start in refs {
            if let Entry::Vacant(e) = came_from.entry(start) {
                e.insert(target);
                stack.push(start);
            }
        }

        while let Some(current) = stack.pop() {
            if current == target {
                return Some(cycle_path(&came_from, target));
            }
            let Some(cell) = self.slot(current) else {
                continue;
            };
            for &next in cell.content.referenced_cells() {
                if let Entry::Vacant(e) = came_from.entry(next) {
                    e.insert(current);
                    stack.push(next);
                }
            }
        }

        None
    }

    /// Point `pos` at exactly `refs`: drop its old outgoing edges from the
    /// incoming-edge map, then register the new ones. `pos` must hold a cell.
    pub(crate) fn replace_dependencies(&mut self, pos: Position, refs: &[Position]) {
        let Some(cell) = self.slot_mut(pos) else {
            return;
        };
        let old = std::mem::replace(&mut cell.depends_on, refs.iter().copied().collect());

        for dep in old {
            if let Entry::Occupied(mut e) = self.dependents.entry(dep) {
                e.get_mut().remove(&pos);
                if e.get().is_empty() {
                    e.remove();
                }
            }
        }
        for &dep in refs {
            self.dependents.entry(dep).or_default().insert(pos);
        }
    }

    /// Remove the cell at `pos` after dropping its outgoing edges.
    ///
    /// Formulas that read `pos` keep their edge; they see the vacant slot as
    /// empty and are re-attached if `pos` is written again.
    pub(crate) fn destroy_cell(&mut self, pos: Position) -> Option<Box<Cell>> {
        self.replace_dependencies(pos, &[]);
        self.take_slot(pos)
    }

    /// Drop the cached value of `origin` and of every cell that transitively
    /// reads it.
    pub(crate) fn invalidate_dependents(&self, origin: Position) {
        let mut visited = HashSet::new();
        let mut stack = vec![origin];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(cell) = self.slot(current) {
                cell.content.invalidate_cache();
            }
            stack.extend(self.dependents_of(current));
        }

        trace!(cell = %origin, invalidated = visited.len(), "invalidated caches");
    }

    /// Evaluate every cold formula `origin` transitively reads, dependencies
    /// first, then `origin` itself.
    ///
    /// Afterwards evaluating `origin` only ever looks at cached values, so the
    /// evaluator's recursion stays one level deep however long the chain is.
    pub(crate) fn warm_caches(&self, origin: Position) {
        if !self.is_cold_formula(origin) {
            return;
        }

        let mut visited = HashSet::new();
        // (position, dependencies already pushed)
        let mut stack = vec![(origin, false)];

        while let Some((pos, expanded)) = stack.pop() {
            let Some(cell) = self.slot(pos) else {
                continue;
            };
            let Content::Formula(formula) = &cell.content else {
                continue;
            };
            if expanded {
                let _ = formula.value(self);
                continue;
            }
            if formula.cached_value().is_some() || !visited.insert(pos) {
                continue;
            }
            stack.push((pos, true));
            stack.extend(cell.depends_on.iter().map(|&dep| (dep, false)));
        }

        trace!(cell = %origin, evaluated = visited.len(), "filled caches");
    }

    fn is_cold_formula(&self, pos: Position) -> bool {
        self.slot(pos).is_some_and(|cell| {
            matches!(&cell.content, Content::Formula(f) if f.cached_value().is_none())
        })
    }

    /// Check all structural invariants. Panics if any are violated.
    ///
    /// - storage is exactly `extent` and `extent` is tight
    /// - `depends_on` matches the cell's formula references
    /// - every `depends_on` edge is registered in `dependents` and vice versa
    /// - the `depends_on` graph is acyclic
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        let size = self.extent;
        assert_eq!(self.cells.len(), size.rows, "row storage differs from extent");
        for row in &self.cells {
            assert_eq!(row.len(), size.cols, "column storage differs from extent");
        }
        if size.rows == 0 || size.cols == 0 {
            assert_eq!(size.rows, size.cols, "degenerate extent {}", size);
        } else {
            assert!(
                self.cells[size.rows - 1].iter().any(Option::is_some),
                "last row of {} is empty",
                size
            );
            assert!(
                self.cells.iter().any(|row| row[size.cols - 1].is_some()),
                "last column of {} is empty",
                size
            );
        }

        for (pos, cell) in self.occupied() {
            let expected: HashSet<Position> =
                cell.content.referenced_cells().iter().copied().collect();
            assert_eq!(cell.depends_on, expected, "{} edges differ from its formula", pos);

            for dep in &cell.depends_on {
                assert!(
                    self.dependents.get(dep).is_some_and(|d| d.contains(&pos)),
                    "Missing dependent edge: {} should list {}",
                    dep,
                    pos
                );
            }
        }
        for (target, sources) in &self.dependents {
            assert!(!sources.is_empty(), "{} has an empty dependents entry", target);
            for source in sources {
                let cell = self
                    .slot(*source)
                    .unwrap_or_else(|| panic!("{} is read by missing cell {}", target, source));
                assert!(
                    cell.depends_on.contains(target),
                    "Missing dependency edge: {} should list {}",
                    source,
                    target
                );
            }
        }

        // Kahn's algorithm: peel off cells with no remaining dependencies.
        // Vacant targets have no outgoing edges and cannot sit on a cycle.
        let mut remaining: HashMap<Position, usize> = self
            .occupied()
            .map(|(pos, cell)| {
                let occupied_deps = cell
                    .depends_on
                    .iter()
                    .filter(|dep| self.slot(**dep).is_some())
                    .count();
                (pos, occupied_deps)
            })
            .collect();
        let mut ready: Vec<Position> = remaining
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(pos, _)| *pos)
            .collect();
        let mut peeled = 0;
        while let Some(pos) = ready.pop() {
            peeled += 1;
            for dependent in self.dependents_of(pos) {
                if let Some(n) = remaining.get_mut(&dependent) {
                    *n -= 1;
                    if *n == 0 {
                        ready.push(dependent);
                    }
                }
            }
        }
        assert_eq!(peeled, remaining.len(), "dependency graph has a cycle");
    }
}

fn cycle_path(came_from: &HashMap<Position, Position>, target: Position) -> Vec<Position> {
    let mut path = vec![target];
    let mut current = came_from[&target];
    while current != target {
        path.push(current);
        current = came_from[&current];
    }
    path.push(target);
    path.reverse();
    path
}
