#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy tower placement that maximises raw path coverage under a gold budget.

use std::collections::BTreeSet;

use alien_defence_core::{Bounds, LevelError, Path, Position, TowerTemplate};
use tracing::debug;

/// Free cell annotated with the number of path steps it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredCell {
    /// Candidate tower cell.
    pub position: Position,
    /// Path steps within range, counting revisited cells again.
    pub coverage: usize,
}

/// Placement optimizer that reuses its candidate buffers between runs.
///
/// The heuristic is one-shot: it ignores tower interplay and alien order and
/// ranks cells purely by how many path steps they reach.
#[derive(Debug, Default)]
pub struct TowerPlacer {
    occupied: BTreeSet<Position>,
    candidates: Vec<ScoredCell>,
}

impl TowerPlacer {
    /// Creates a new placer with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects tower cells for the budget `gold` affords.
    ///
    /// Cells are ranked by descending coverage; ties keep the column-major
    /// enumeration order of [`Bounds::cells`]. Fails when the budget buys more
    /// towers than there are free cells.
    pub fn place(
        &mut self,
        bounds: Bounds,
        path: &Path,
        tower: &TowerTemplate,
        gold: i64,
    ) -> Result<Vec<Position>, LevelError> {
        self.rescore(bounds, path, tower.range);

        let budget = tower.budget(gold);
        if budget > self.candidates.len() {
            return Err(LevelError::InsufficientCapacity {
                requested: budget,
                available: self.candidates.len(),
            });
        }

        self.candidates
            .sort_by(|left, right| right.coverage.cmp(&left.coverage));

        let chosen: Vec<Position> = self
            .candidates
            .iter()
            .take(budget)
            .map(|candidate| candidate.position)
            .collect();
        debug!(budget, free_cells = self.candidates.len(), ?chosen, "towers placed");
        Ok(chosen)
    }

    /// Scores every free cell in enumeration order.
    pub fn score(&mut self, bounds: Bounds, path: &Path, range: f64) -> &[ScoredCell] {
        self.rescore(bounds, path, range);
        &self.candidates
    }

    fn rescore(&mut self, bounds: Bounds, path: &Path, range: f64) {
        self.occupied.clear();
        self.occupied.extend(path.cells().iter().copied());

        self.candidates.clear();
        for position in bounds.cells() {
            if self.occupied.contains(&position) {
                continue;
            }
            self.candidates.push(ScoredCell {
                position,
                coverage: coverage(position, path, range),
            });
        }
    }
}

/// Counts the path steps within `range` of `position`, sentinel excluded.
#[must_use]
pub fn coverage(position: Position, path: &Path, range: f64) -> usize {
    path.cells()
        .iter()
        .filter(|cell| position.distance_to(**cell) <= range)
        .count()
}
