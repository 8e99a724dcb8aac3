#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that expands path commands into the cell-by-cell alien path.

use alien_defence_core::{Bounds, PathCommand, Pose, Position};

/// Path builder that reuses its unit-step buffer between builds.
#[derive(Debug, Default)]
pub struct PathBuilder {
    unit_steps: Vec<PathCommand>,
}

impl PathBuilder {
    /// Creates a new path builder with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks `commands` from `start` and records every cell entered.
    ///
    /// The output begins with the start position and gains one entry per
    /// advanced cell, including cells where clamping at the border left the
    /// walker in place. Turns contribute no cell. The breach sentinel is not
    /// appended here; seal the result with [`alien_defence_core::Path::new`].
    pub fn build(&mut self, bounds: Bounds, start: Pose, commands: &[PathCommand]) -> Vec<Position> {
        self.decompose(commands);

        let mut cells = Vec::with_capacity(self.unit_steps.len() + 1);
        cells.push(start.position);

        let mut pose = start;
        for &command in &self.unit_steps {
            pose = apply_command(pose, command, bounds);
            if matches!(command, PathCommand::Advance(_)) {
                cells.push(pose.position);
            }
        }
        cells
    }

    fn decompose(&mut self, commands: &[PathCommand]) {
        self.unit_steps.clear();
        for &command in commands {
            match command {
                PathCommand::Advance(steps) => {
                    for _ in 0..steps {
                        self.unit_steps.push(PathCommand::Advance(1));
                    }
                }
                PathCommand::Turn(_) => self.unit_steps.push(command),
            }
        }
    }
}

/// Applies a single command to `pose`.
///
/// Advances move the full distance along the heading before both coordinates
/// are clamped into the grid independently; turns only rotate.
#[must_use]
pub fn apply_command(pose: Pose, command: PathCommand, bounds: Bounds) -> Pose {
    match command {
        PathCommand::Advance(steps) => {
            let (dx, dy) = pose.heading.offset();
            let distance = i32::try_from(steps).unwrap_or(i32::MAX);
            let moved = Position::new(
                pose.position.x().saturating_add(dx.saturating_mul(distance)),
                pose.position.y().saturating_add(dy.saturating_mul(distance)),
            );
            Pose::new(bounds.clamp(moved), pose.heading)
        }
        PathCommand::Turn(quarter_turns) => {
            Pose::new(pose.position, pose.heading.turned(quarter_turns))
        }
    }
}
