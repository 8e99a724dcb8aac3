//! Alien roster owned by the world.

use alien_defence_core::{AlienId, AlienSnapshot, AlienTemplate, Position};

#[derive(Clone, Debug)]
pub(crate) struct Alien {
    pub(crate) id: AlienId,
    pub(crate) position: Position,
    pub(crate) health: f64,
    pub(crate) speed: f64,
    pub(crate) spawn_tick: u64,
    pub(crate) dead: bool,
}

impl Alien {
    fn from_template(id: AlienId, template: AlienTemplate, spawn_tick: u64) -> Self {
        Self {
            id,
            position: Position::OFF_BOARD,
            health: template.health,
            speed: template.speed,
            spawn_tick,
            dead: false,
        }
    }

    pub(crate) fn snapshot(&self) -> AlienSnapshot {
        AlienSnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            speed: self.speed,
            spawn_tick: self.spawn_tick,
            dead: self.dead,
        }
    }
}

/// Builds the roster in spawn-list order; the index doubles as the identifier.
pub(crate) fn roster(template: AlienTemplate, spawn_ticks: &[u64]) -> Vec<Alien> {
    spawn_ticks
        .iter()
        .zip(0_u32..)
        .map(|(&spawn_tick, index)| Alien::from_template(AlienId::new(index), template, spawn_tick))
        .collect()
}
