#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that maintains sticky tower target locks from world snapshots.

use alien_defence_core::{
    AlienId, AlienView, Command, Position, TargetLock, TowerSnapshot, TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    alien_workspace: Vec<AlienCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the lock phase for every tower.
    ///
    /// Emits `Command::LockTarget` only for towers whose lock changes this
    /// tick, in placement order.
    pub fn handle(&mut self, towers: &TowerView, aliens: &AlienView, out: &mut Vec<Command>) {
        if towers.is_empty() {
            return;
        }

        self.prepare_alien_workspace(aliens);

        for tower in towers.iter() {
            let lock = self.resolve(tower);
            if lock != tower.lock {
                out.push(Command::LockTarget {
                    tower: tower.id,
                    lock,
                });
            }
        }
    }

    /// Lock a single tower should hold after this tick's evaluation.
    ///
    /// A valid lock is kept even when a closer alien is available. Otherwise
    /// the closest targetable alien in range wins, ties going to the earliest
    /// roster entry.
    fn resolve(&self, tower: &TowerSnapshot) -> TargetLock {
        if let TargetLock::Locked(current) = tower.lock {
            let retained = self
                .candidate(current)
                .is_some_and(|candidate| in_range(tower, candidate.position));
            if retained {
                return tower.lock;
            }
        }

        let mut best: Option<BestCandidate> = None;
        for candidate in &self.alien_workspace {
            let distance = tower.position.distance_to(candidate.position);
            if distance > tower.range {
                continue;
            }

            let current = BestCandidate {
                distance,
                alien: candidate.id,
            };
            match &mut best {
                Some(existing) => {
                    if current.precedes(existing) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map_or(TargetLock::Unlocked, |candidate| {
            TargetLock::Locked(candidate.alien)
        })
    }

    fn prepare_alien_workspace(&mut self, aliens: &AlienView) {
        self.alien_workspace.clear();
        self.alien_workspace.reserve(aliens.len());

        for snapshot in aliens.iter().filter(|snapshot| snapshot.is_targetable()) {
            self.alien_workspace.push(AlienCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }

    fn candidate(&self, alien: AlienId) -> Option<&AlienCandidate> {
        self.alien_workspace
            .binary_search_by_key(&alien, |candidate| candidate.id)
            .ok()
            .map(|index| &self.alien_workspace[index])
    }
}

/// Reports whether `position` lies within the tower's Euclidean range.
#[must_use]
pub fn in_range(tower: &TowerSnapshot, position: Position) -> bool {
    tower.position.distance_to(position) <= tower.range
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AlienCandidate {
    id: AlienId,
    position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f64,
    alien: AlienId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.alien < other.alien
    }
}
