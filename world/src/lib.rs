#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Alien Defence.

mod aliens;
mod towers;

use std::collections::BTreeSet;

use alien_defence_core::{
    AlienId, AlienTemplate, Bounds, Command, Event, Outcome, Path, PlacementError, Position,
    TargetLock,
};
use tracing::{debug, info};

use crate::{aliens::Alien, towers::TowerRegistry};

/// Represents the authoritative Alien Defence world state.
///
/// The world exclusively owns the alien roster, the tower registry, the
/// clock and the outcome. Everything else observes it through [`query`].
#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    path: Path,
    path_cells: BTreeSet<Position>,
    aliens: Vec<Alien>,
    towers: TowerRegistry,
    clock: Option<u64>,
    outcome: Outcome,
}

impl World {
    /// Creates a world for the provided path and wave.
    ///
    /// Path occupancy is captured once here; later tower placements are
    /// checked against it.
    #[must_use]
    pub fn new(bounds: Bounds, path: Path, alien: AlienTemplate, spawn_ticks: &[u64]) -> Self {
        let path_cells = path.cells().iter().copied().collect();
        Self {
            bounds,
            path_cells,
            path,
            aliens: aliens::roster(alien, spawn_ticks),
            towers: TowerRegistry::new(),
            clock: None,
            outcome: Outcome::Pending,
        }
    }

    fn alien_mut(&mut self, alien: AlienId) -> Option<&mut Alien> {
        let index = usize::try_from(alien.get()).ok()?;
        self.aliens.get_mut(index)
    }

    fn decide(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = outcome;
        info!(%outcome, tick = ?self.clock, "outcome decided");
        out_events.push(Event::OutcomeDecided { outcome });
    }

    fn placement_error(&self, position: Position) -> Option<PlacementError> {
        if !self.bounds.contains(position) {
            Some(PlacementError::OutOfBounds)
        } else if self.path_cells.contains(&position) {
            Some(PlacementError::OnPath)
        } else if self.towers.at(position).is_some() {
            Some(PlacementError::Occupied)
        } else {
            None
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the outcome is terminal every further command is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome.is_terminal() {
        return;
    }

    match command {
        Command::Tick => {
            let tick = world.clock.map_or(0, |tick| tick.saturating_add(1));
            world.clock = Some(tick);
            out_events.push(Event::TimeAdvanced { tick });
        }
        Command::PlaceTower {
            position,
            damage,
            range,
        } => {
            if let Some(reason) = world.placement_error(position) {
                debug!(%position, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { position, reason });
                return;
            }
            let tower = world.towers.insert(position, damage, range);
            out_events.push(Event::TowerPlaced { tower, position });
        }
        Command::MoveAlien { alien, position } => {
            let Some(state) = world.alien_mut(alien) else {
                return;
            };
            if state.dead {
                return;
            }

            let from = state.position;
            state.position = position;
            if from != position {
                out_events.push(Event::AlienMoved {
                    alien,
                    from,
                    to: position,
                });
            }

            if position == Position::BREACH {
                out_events.push(Event::AlienBreached { alien });
                world.decide(Outcome::Loss, out_events);
            }
        }
        Command::LockTarget { tower, lock } => {
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };
            if state.lock == lock {
                return;
            }

            if let TargetLock::Locked(previous) = state.lock {
                out_events.push(Event::TargetReleased {
                    tower,
                    alien: previous,
                });
            }
            if let TargetLock::Locked(alien) = lock {
                out_events.push(Event::TargetLocked { tower, alien });
            }
            state.lock = lock;
        }
        Command::DamageAlien {
            tower,
            alien,
            damage,
        } => {
            let Some(state) = world.alien_mut(alien) else {
                return;
            };
            if state.dead {
                return;
            }

            state.health -= damage;
            out_events.push(Event::AlienDamaged {
                tower,
                alien,
                health: state.health,
            });
        }
        Command::ResolveDeaths => {
            for alien in world.aliens.iter_mut() {
                if !alien.dead && alien.health <= 0.0 {
                    alien.dead = true;
                    out_events.push(Event::AlienKilled { alien: alien.id });
                }
            }
        }
        Command::EvaluateOutcome => {
            if world.aliens.iter().all(|alien| alien.dead) {
                world.decide(Outcome::Win, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use alien_defence_core::{AlienView, Outcome, Path, Position, TowerView};

    use super::World;

    /// Path walked by every alien, including the breach sentinel.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Current tick, or `None` before the first tick.
    #[must_use]
    pub fn tick(world: &World) -> Option<u64> {
        world.clock
    }

    /// Outcome reached so far.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Captures a read-only view of the alien roster.
    #[must_use]
    pub fn alien_view(world: &World) -> AlienView {
        AlienView::from_snapshots(world.aliens.iter().map(|alien| alien.snapshot()).collect())
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Tower positions in placement order.
    #[must_use]
    pub fn tower_positions(world: &World) -> Vec<Position> {
        world.towers.iter().map(|tower| tower.position).collect()
    }

    /// Number of aliens that are still alive.
    #[must_use]
    pub fn alive_count(world: &World) -> usize {
        world.aliens.iter().filter(|alien| !alien.dead).count()
    }
}
