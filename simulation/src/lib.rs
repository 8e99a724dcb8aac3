#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven simulation loop that runs a level to a terminal outcome.
//!
//! The loop owns the authoritative [`World`] together with every system. Each
//! tick it asks the systems for command batches and applies them in a fixed
//! order: clock, motion, lock phase, fire phase, outcome evaluation.

use alien_defence_core::{Command, Event, Level, LevelError, Outcome, Path, Position};
use alien_defence_system_motion::Motion;
use alien_defence_system_path_builder::PathBuilder;
use alien_defence_system_placement::TowerPlacer;
use alien_defence_system_tower_combat::CombatResolver;
use alien_defence_world::{self as world, query, World};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Final state handed to output collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// Outcome reached by the run.
    pub outcome: Outcome,
    /// Last tick that was simulated, `None` if no tick ran.
    pub tick: Option<u64>,
    /// Tower cells in placement order.
    pub towers: Vec<Position>,
}

/// Owner of the world and the systems that drive it.
#[derive(Debug)]
pub struct SimulationLoop {
    world: World,
    motion: Motion,
    combat: CombatResolver,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl SimulationLoop {
    /// Validates `level`, builds its path and places the affordable towers.
    pub fn new(level: &Level) -> Result<Self, LevelError> {
        level.validate()?;

        let cells = PathBuilder::new().build(level.bounds, level.start, &level.commands);
        let path = Path::new(cells);
        let placements = TowerPlacer::new().place(level.bounds, &path, &level.tower, level.gold)?;

        let mut world = World::new(level.bounds, path, level.alien, &level.spawn_ticks);
        let mut events = Vec::new();
        for position in placements {
            world::apply(
                &mut world,
                Command::PlaceTower {
                    position,
                    damage: level.tower.damage,
                    range: level.tower.range,
                },
                &mut events,
            );
        }
        for event in &events {
            if let Event::TowerPlacementRejected { position, reason } = event {
                warn!(%position, %reason, "planned tower was rejected by the world");
            }
        }

        info!(
            path_len = query::path(&world).len(),
            aliens = level.spawn_ticks.len(),
            towers = query::tower_view(&world).len(),
            "level prepared"
        );

        Ok(Self {
            world,
            motion: Motion::new(),
            combat: CombatResolver::new(),
            commands: Vec::new(),
            events,
        })
    }

    /// Runs a single tick and returns the outcome afterwards.
    ///
    /// Calling `step` after a terminal outcome is a no-op.
    pub fn step(&mut self) -> Outcome {
        let outcome = query::outcome(&self.world);
        if outcome.is_terminal() {
            return outcome;
        }

        self.events.clear();
        world::apply(&mut self.world, Command::Tick, &mut self.events);
        let tick = query::tick(&self.world).unwrap_or_default();

        self.motion.handle(
            &self.events,
            query::path(&self.world),
            &query::alien_view(&self.world),
            &mut self.commands,
        );
        self.flush();
        if query::outcome(&self.world).is_terminal() {
            return self.conclude_tick(tick);
        }

        self.combat.lock(
            &query::tower_view(&self.world),
            &query::alien_view(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.combat.fire(tick, &query::tower_view(&self.world), &mut self.commands);
        self.flush();

        self.commands.push(Command::EvaluateOutcome);
        self.flush();

        self.conclude_tick(tick)
    }

    /// Steps until the outcome is terminal.
    ///
    /// There is no tick cap: a wave that can neither breach nor be destroyed
    /// keeps this running forever. Use [`SimulationLoop::run_for`] to bound it.
    pub fn run(mut self) -> SimulationReport {
        while !self.step().is_terminal() {}
        self.report()
    }

    /// Steps at most `max_ticks` times, stopping early on a terminal outcome.
    pub fn run_for(&mut self, max_ticks: u64) -> Outcome {
        for _ in 0..max_ticks {
            if self.step().is_terminal() {
                break;
            }
        }
        query::outcome(&self.world)
    }

    /// Snapshot of the current outcome, tick and tower list.
    #[must_use]
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            outcome: query::outcome(&self.world),
            tick: query::tick(&self.world),
            towers: query::tower_positions(&self.world),
        }
    }

    /// Read-only access to the world being simulated.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events broadcast during the most recent tick, or during setup before the first one.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
            if query::outcome(&self.world).is_terminal() {
                break;
            }
        }
    }

    fn conclude_tick(&self, tick: u64) -> Outcome {
        for event in &self.events {
            trace!(tick, ?event, "event");
        }
        let outcome = query::outcome(&self.world);
        debug!(
            tick,
            alive = query::alive_count(&self.world),
            %outcome,
            "tick resolved"
        );
        outcome
    }
}
