#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic motion system that maps ticks onto path positions.

use alien_defence_core::{AlienView, Command, Event, Path, Position};

/// Discrete motion model: aliens teleport to the floor-indexed path step.
///
/// Fractional progress accumulates but only whole steps are observable, so
/// fast aliens skip cells between ticks.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionModel;

impl MotionModel {
    /// Position of an alien on `tick`.
    ///
    /// Returns [`Position::OFF_BOARD`] before `spawn_tick`. Afterwards the
    /// index `floor((tick - spawn_tick) * speed)` is clamped onto the breach
    /// sentinel at the end of the path.
    #[must_use]
    pub fn position_at(path: &Path, tick: u64, spawn_tick: u64, speed: f64) -> Position {
        if tick < spawn_tick {
            return Position::OFF_BOARD;
        }

        let elapsed = (tick - spawn_tick) as f64;
        let progress = (elapsed * speed).floor();
        // Float-to-int casts saturate, and `Path::get` clamps the rest.
        path.get(progress as usize)
    }
}

/// Pure system that relocates every living alien once per tick.
#[derive(Debug, Default)]
pub struct Motion;

impl Motion {
    /// Creates a new motion system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::MoveAlien` for every living alien in roster order.
    ///
    /// Nothing is emitted unless `events` contains `Event::TimeAdvanced`.
    pub fn handle(&self, events: &[Event], path: &Path, aliens: &AlienView, out: &mut Vec<Command>) {
        let Some(tick) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { tick } => Some(*tick),
            _ => None,
        }) else {
            return;
        };

        for alien in aliens.iter().filter(|alien| !alien.dead) {
            out.push(Command::MoveAlien {
                alien: alien.id,
                position: MotionModel::position_at(path, tick, alien.spawn_tick, alien.speed),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_defence_core::{AlienId, AlienSnapshot};

    fn path() -> Path {
        Path::new(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(2, 0),
        ])
    }

    #[test]
    fn off_board_before_spawn() {
        let path = path();
        for tick in 0..4 {
            assert_eq!(
                MotionModel::position_at(&path, tick, 4, 1.0),
                Position::OFF_BOARD
            );
        }
        assert_eq!(
            MotionModel::position_at(&path, 4, 4, 1.0),
            Position::new(0, 0)
        );
    }

    #[test]
    fn fractional_speed_only_moves_on_whole_steps() {
        let path = path();
        let positions: Vec<_> = (0..5)
            .map(|tick| MotionModel::position_at(&path, tick, 0, 0.5))
            .collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 0),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn fast_aliens_skip_cells() {
        let path = path();
        assert_eq!(
            MotionModel::position_at(&path, 1, 0, 2.0),
            Position::new(2, 0)
        );
    }

    #[test]
    fn progress_past_the_end_clamps_to_breach() {
        let path = path();
        assert_eq!(MotionModel::position_at(&path, 3, 0, 1.0), Position::BREACH);
        assert_eq!(
            MotionModel::position_at(&path, 1_000, 0, 7.5),
            Position::BREACH
        );
        assert_eq!(
            MotionModel::position_at(&path, u64::MAX, 0, f64::MAX),
            Position::BREACH
        );
    }

    fn snapshot(id: u32, spawn_tick: u64, dead: bool) -> AlienSnapshot {
        AlienSnapshot {
            id: AlienId::new(id),
            position: Position::OFF_BOARD,
            health: 1.0,
            speed: 1.0,
            spawn_tick,
            dead,
        }
    }

    #[test]
    fn handle_skips_dead_aliens_and_waits_for_time() {
        let path = path();
        let aliens = AlienView::from_snapshots(vec![
            snapshot(2, 0, false),
            snapshot(0, 1, false),
            snapshot(1, 0, true),
        ]);
        let motion = Motion::new();

        let mut out = Vec::new();
        motion.handle(&[], &path, &aliens, &mut out);
        assert!(out.is_empty());

        motion.handle(&[Event::TimeAdvanced { tick: 1 }], &path, &aliens, &mut out);
        assert_eq!(
            out,
            vec![
                Command::MoveAlien {
                    alien: AlienId::new(0),
                    position: Position::new(0, 0),
                },
                Command::MoveAlien {
                    alien: AlienId::new(2),
                    position: Position::new(1, 0),
                },
            ]
        );
    }
}
