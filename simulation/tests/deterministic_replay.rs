use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use alien_defence_core::{
    AlienId, AlienTemplate, Bounds, Event, Heading, Level, Outcome, PathCommand, PlacementError,
    Pose, Position, TowerId, TowerTemplate,
};
use alien_defence_simulation::{SimulationLoop, SimulationReport};

#[test]
fn deterministic_replay_of_a_winding_level() {
    let level = winding_level();
    let first = replay(&level);
    let second = replay(&level);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    assert_eq!(first.report.outcome, Outcome::Win);
    assert_eq!(first.report.towers.len(), 3);

    let kills: Vec<_> = first
        .events
        .iter()
        .filter_map(|event| match event {
            EventRecord::AlienKilled { alien } => Some(*alien),
            _ => None,
        })
        .collect();
    let mut sorted = kills.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted, vec![0, 1, 2], "every alien dies exactly once");
    assert_eq!(kills.len(), 3);

    assert!(
        !first
            .events
            .iter()
            .any(|event| matches!(event, EventRecord::AlienBreached { .. })),
        "no alien may breach on a winning run"
    );
}

#[test]
fn fingerprint_distinguishes_different_levels() {
    let level = winding_level();
    let mut weaker = level.clone();
    weaker.tower.damage = 0.5;

    assert_ne!(replay(&level).fingerprint(), replay(&weaker).fingerprint());
}

fn winding_level() -> Level {
    Level {
        bounds: Bounds::new(8, 6),
        start: Pose::new(Position::new(0, 1), Heading::East),
        commands: vec![
            PathCommand::Advance(6),
            PathCommand::Turn(1),
            PathCommand::Advance(3),
            PathCommand::Turn(1),
            PathCommand::Advance(5),
        ],
        alien: AlienTemplate {
            health: 3.0,
            speed: 0.75,
        },
        spawn_ticks: vec![0, 2, 4],
        tower: TowerTemplate {
            damage: 1.0,
            range: 2.5,
            cost: 10,
        },
        gold: 35,
    }
}

fn replay(level: &Level) -> ReplayOutcome {
    let mut simulation = SimulationLoop::new(level).expect("valid level");
    let mut events: Vec<EventRecord> = simulation
        .events()
        .iter()
        .cloned()
        .map(EventRecord::from)
        .collect();

    while !simulation.step().is_terminal() {
        events.extend(simulation.events().iter().cloned().map(EventRecord::from));
    }
    events.extend(simulation.events().iter().cloned().map(EventRecord::from));

    ReplayOutcome {
        events,
        report: simulation.report(),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    events: Vec<EventRecord>,
    report: SimulationReport,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.events.hash(&mut hasher);
        self.report.outcome.hash(&mut hasher);
        self.report.tick.hash(&mut hasher);
        self.report.towers.hash(&mut hasher);
        hasher.finish()
    }
}

/// Hashable mirror of [`Event`]; health is recorded by its bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    TimeAdvanced { tick: u64 },
    TowerPlaced { tower: u32, cell: (i32, i32) },
    TowerPlacementRejected { cell: (i32, i32), reason: u8 },
    AlienMoved { alien: u32, to: (i32, i32) },
    AlienBreached { alien: u32 },
    TargetLocked { tower: u32, alien: u32 },
    TargetReleased { tower: u32, alien: u32 },
    AlienDamaged { tower: u32, alien: u32, health: u64 },
    AlienKilled { alien: u32 },
    OutcomeDecided { outcome: Outcome },
}

fn cell(position: Position) -> (i32, i32) {
    (position.x(), position.y())
}

fn tower_index(tower: TowerId) -> u32 {
    tower.get()
}

fn alien_index(alien: AlienId) -> u32 {
    alien.get()
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        match event {
            Event::TimeAdvanced { tick } => Self::TimeAdvanced { tick },
            Event::TowerPlaced { tower, position } => Self::TowerPlaced {
                tower: tower_index(tower),
                cell: cell(position),
            },
            Event::TowerPlacementRejected { position, reason } => Self::TowerPlacementRejected {
                cell: cell(position),
                reason: match reason {
                    PlacementError::OutOfBounds => 0,
                    PlacementError::OnPath => 1,
                    PlacementError::Occupied => 2,
                },
            },
            Event::AlienMoved { alien, to, .. } => Self::AlienMoved {
                alien: alien_index(alien),
                to: cell(to),
            },
            Event::AlienBreached { alien } => Self::AlienBreached {
                alien: alien_index(alien),
            },
            Event::TargetLocked { tower, alien } => Self::TargetLocked {
                tower: tower_index(tower),
                alien: alien_index(alien),
            },
            Event::TargetReleased { tower, alien } => Self::TargetReleased {
                tower: tower_index(tower),
                alien: alien_index(alien),
            },
            Event::AlienDamaged {
                tower,
                alien,
                health,
            } => Self::AlienDamaged {
                tower: tower_index(tower),
                alien: alien_index(alien),
                health: health.to_bits(),
            },
            Event::AlienKilled { alien } => Self::AlienKilled {
                alien: alien_index(alien),
            },
            Event::OutcomeDecided { outcome } => Self::OutcomeDecided { outcome },
        }
    }
}
