//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use alien_defence_core::{Position, TargetLock, TowerId, TowerSnapshot};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Cell occupied by the tower.
    pub(crate) position: Position,
    /// Health removed from the target per tick.
    pub(crate) damage: f64,
    /// Euclidean reach of the tower.
    pub(crate) range: f64,
    /// Current target lock.
    pub(crate) lock: TargetLock,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            damage: self.damage,
            range: self.range,
            lock: self.lock,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new unlocked tower and returns its identifier.
    pub(crate) fn insert(&mut self, position: Position, damage: f64, range: f64) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get() + 1);
        let previous = self.entries.insert(
            id,
            TowerState {
                id,
                position,
                damage,
                range,
                lock: TargetLock::Unlocked,
            },
        );
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    /// Identifier of the tower occupying `position`, if any.
    pub(crate) fn at(&self, position: Position) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.position == position)
            .map(|tower| tower.id)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    /// Towers in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}
