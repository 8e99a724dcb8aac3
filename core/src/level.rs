//! Parsed level description and its validation rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Bounds, PathCommand, Pose, Position};

/// Attributes shared by every alien of the wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlienTemplate {
    /// Health each alien starts with.
    pub health: f64,
    /// Path steps travelled per tick.
    pub speed: f64,
}

/// Attributes shared by every tower the level can afford.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTemplate {
    /// Health removed from the locked target per tick.
    pub damage: f64,
    /// Euclidean reach of the tower.
    pub range: f64,
    /// Gold spent per tower.
    pub cost: i64,
}

impl TowerTemplate {
    /// Number of towers `gold` pays for, `floor(gold / cost)`.
    ///
    /// Non-positive costs or negative gold afford nothing; validated levels
    /// never contain them.
    #[must_use]
    pub fn budget(&self, gold: i64) -> usize {
        if self.cost <= 0 || gold <= 0 {
            return 0;
        }
        usize::try_from(gold / self.cost).unwrap_or(usize::MAX)
    }
}

/// Fully parsed level handed to the simulation by a loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Inclusive grid bounds.
    pub bounds: Bounds,
    /// Pose the path starts from.
    pub start: Pose,
    /// Instructions that shape the path.
    #[serde(default)]
    pub commands: Vec<PathCommand>,
    /// Template applied to every alien of the wave.
    pub alien: AlienTemplate,
    /// Spawn tick of each alien, in roster order.
    pub spawn_ticks: Vec<u64>,
    /// Template applied to every tower.
    pub tower: TowerTemplate,
    /// Gold available for towers.
    pub gold: i64,
}

impl Level {
    /// Rejects inconsistent level data before any simulation work starts.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.bounds.width() < 0 || self.bounds.height() < 0 {
            return Err(LevelError::NegativeBounds {
                width: self.bounds.width(),
                height: self.bounds.height(),
            });
        }
        if !self.bounds.contains(self.start.position) {
            return Err(LevelError::StartOutOfBounds {
                start: self.start.position,
                bounds: self.bounds,
            });
        }
        if !(self.alien.health.is_finite() && self.alien.health > 0.0) {
            return Err(LevelError::InvalidHealth(self.alien.health));
        }
        if !(self.alien.speed.is_finite() && self.alien.speed > 0.0) {
            return Err(LevelError::InvalidSpeed(self.alien.speed));
        }
        if self.spawn_ticks.is_empty() {
            return Err(LevelError::EmptyWave);
        }
        if u32::try_from(self.spawn_ticks.len()).is_err() {
            return Err(LevelError::WaveTooLarge(self.spawn_ticks.len()));
        }
        if !(self.tower.damage.is_finite() && self.tower.damage >= 0.0) {
            return Err(LevelError::InvalidDamage(self.tower.damage));
        }
        if !(self.tower.range.is_finite() && self.tower.range >= 0.0) {
            return Err(LevelError::InvalidRange(self.tower.range));
        }
        if self.tower.cost <= 0 {
            return Err(LevelError::NonPositiveCost(self.tower.cost));
        }
        if self.gold < 0 {
            return Err(LevelError::NegativeGold(self.gold));
        }
        Ok(())
    }
}

/// Configuration errors detected at the level boundary.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LevelError {
    /// Grid bounds must not be negative.
    #[error("grid bounds {width}x{height} must not be negative")]
    NegativeBounds {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
    },
    /// The path must start on the grid.
    #[error("start position {start} lies outside the {}x{} grid", .bounds.width(), .bounds.height())]
    StartOutOfBounds {
        /// Configured start.
        start: Position,
        /// Configured bounds.
        bounds: Bounds,
    },
    /// Aliens must start with positive, finite health.
    #[error("alien health {0} must be positive and finite")]
    InvalidHealth(f64),
    /// Aliens must move forward at a finite speed.
    #[error("alien speed {0} must be positive and finite")]
    InvalidSpeed(f64),
    /// The wave needs at least one alien.
    #[error("the wave contains no aliens")]
    EmptyWave,
    /// The roster exceeds the identifier space.
    #[error("the wave contains {0} aliens, more than can be identified")]
    WaveTooLarge(usize),
    /// Tower damage must be finite and not negative.
    #[error("tower damage {0} must be finite and not negative")]
    InvalidDamage(f64),
    /// Tower range must be finite and not negative.
    #[error("tower range {0} must be finite and not negative")]
    InvalidRange(f64),
    /// Towers must cost something.
    #[error("tower cost {0} must be positive")]
    NonPositiveCost(i64),
    /// Gold must not be negative.
    #[error("gold {0} must not be negative")]
    NegativeGold(i64),
    /// The budget buys more towers than there are free cells.
    #[error("gold buys {requested} towers but only {available} free cells exist")]
    InsufficientCapacity {
        /// Towers the budget pays for.
        requested: usize,
        /// Free cells off the path.
        available: usize,
    },
}
