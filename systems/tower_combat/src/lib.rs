#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves tower locks and emits damage commands.

use alien_defence_core::{AlienView, Command, TargetLock, TowerView};
use alien_defence_system_tower_targeting::TowerTargeting;

/// Ticks at the start of a run during which towers lock but hold fire.
pub const WARM_UP_TICKS: u64 = 1;

/// Two-phase combat resolver.
///
/// The lock phase runs for every tower before the fire phase runs for any of
/// them, so a target acquired this tick is also hit this tick.
#[derive(Debug, Default)]
pub struct CombatResolver {
    targeting: TowerTargeting,
    scratch: Vec<Command>,
}

impl CombatResolver {
    /// Creates a new combat resolver with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock phase: emits `Command::LockTarget` for every tower whose lock changes.
    pub fn lock(&mut self, towers: &TowerView, aliens: &AlienView, out: &mut Vec<Command>) {
        self.targeting.handle(towers, aliens, out);
    }

    /// Fire phase: one `Command::DamageAlien` per locked tower, then
    /// `Command::ResolveDeaths`.
    ///
    /// `towers` must reflect the locks applied by this tick's lock phase.
    /// Nothing is emitted during the warm-up ticks.
    pub fn fire(&mut self, tick: u64, towers: &TowerView, out: &mut Vec<Command>) {
        if tick < WARM_UP_TICKS {
            return;
        }

        self.scratch.clear();
        for tower in towers.iter() {
            if let TargetLock::Locked(alien) = tower.lock {
                self.scratch.push(Command::DamageAlien {
                    tower: tower.id,
                    alien,
                    damage: tower.damage,
                });
            }
        }
        self.scratch.push(Command::ResolveDeaths);

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
