#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Alien Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The simulation loop submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values.
//! Systems query immutable views such as [`AlienView`] and [`TowerView`] and
//! respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

mod level;

pub use level::{AlienTemplate, Level, LevelError, TowerTemplate};

/// Integer grid location of a path cell, tower or alien.
///
/// Grid cells span `[0, width] × [0, height]`; the two negative sentinels
/// [`Position::BREACH`] and [`Position::OFF_BOARD`] never lie on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Terminal path sentinel. An alien that reaches it has breached the defence.
    pub const BREACH: Self = Self::new(-1, -1);

    /// Location reported for aliens that have not spawned yet.
    pub const OFF_BOARD: Self = Self::new(-2, -2);

    /// Creates a new position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing to the east.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, growing to the south.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether the position is one of the off-grid sentinels.
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::BREACH || self == Self::OFF_BOARD
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive upper bounds of the level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    width: i32,
    height: i32,
}

impl Bounds {
    /// Creates new grid bounds.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Largest valid `x` coordinate.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Largest valid `y` coordinate.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Reports whether the position lies within `[0, width] × [0, height]`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        (0..=self.width).contains(&position.x()) && (0..=self.height).contains(&position.y())
    }

    /// Clamps each coordinate independently into the grid.
    ///
    /// Negative bounds collapse onto zero rather than panicking; validated
    /// levels never contain them.
    #[must_use]
    pub fn clamp(&self, position: Position) -> Position {
        Position::new(
            position.x().min(self.width).max(0),
            position.y().min(self.height).max(0),
        )
    }

    /// Iterates every grid cell column by column (`x` outer, `y` inner).
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let height = self.height;
        (0..=self.width).flat_map(move |x| (0..=height).map(move |y| Position::new(x, y)))
    }
}

/// Cardinal headings encoded 0–3 clockwise from north.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    /// Toward decreasing `y`.
    North,
    /// Toward increasing `x`.
    #[default]
    East,
    /// Toward increasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
}

impl Heading {
    const CLOCKWISE: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Decodes a heading from its 0–3 index, wrapping larger values.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self::CLOCKWISE[(index % 4) as usize]
    }

    /// Numeric encoding of the heading.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Rotates by a signed number of clockwise quarter turns.
    #[must_use]
    pub fn turned(self, quarter_turns: i32) -> Self {
        let index = (i32::from(self.index()) + quarter_turns).rem_euclid(4);
        Self::CLOCKWISE[index as usize]
    }

    /// Unit offset travelled by a single step along the heading.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Position paired with a heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    /// Cell occupied by the walker.
    pub position: Position,
    /// Direction the next advance travels in.
    #[serde(default)]
    pub heading: Heading,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}

/// Instruction that shapes the alien path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCommand {
    /// Walk the given number of cells along the current heading.
    Advance(u32),
    /// Rotate by a signed number of clockwise quarter turns.
    Turn(i32),
}

/// Immutable polyline walked by every alien.
///
/// The terminal [`Position::BREACH`] sentinel is appended exactly once on
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Position>,
}

impl Path {
    /// Seals the provided cells into a path by appending the breach sentinel.
    #[must_use]
    pub fn new(mut cells: Vec<Position>) -> Self {
        cells.push(Position::BREACH);
        Self { steps: cells }
    }

    /// Grid cells of the path in walking order, excluding the sentinel.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.steps[..self.steps.len() - 1]
    }

    /// Number of steps including the trailing sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a sealed path holds at least the sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the trailing sentinel.
    #[must_use]
    pub fn terminal_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Returns the step at `index`, clamping indices past the end onto the sentinel.
    #[must_use]
    pub fn get(&self, index: usize) -> Position {
        self.steps[index.min(self.terminal_index())]
    }
}

/// Roster index of an alien.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlienId(u32);

impl AlienId {
    /// Creates a new alien identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower in placement order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Sticky association between a tower and the alien it fires at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetLock {
    /// The tower has no target.
    #[default]
    Unlocked,
    /// The tower fires at the given alien every tick.
    Locked(AlienId),
}

impl TargetLock {
    /// Alien currently targeted, if any.
    #[must_use]
    pub const fn target(self) -> Option<AlienId> {
        match self {
            Self::Unlocked => None,
            Self::Locked(alien) => Some(alien),
        }
    }
}

/// Result of a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// Aliens remain alive and none has breached.
    #[default]
    Pending,
    /// Every alien has been destroyed.
    Win,
    /// An alien reached the end of the path.
    Loss,
}

impl Outcome {
    /// Reports whether the outcome ends the simulation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Win => "WIN",
            Self::Loss => "LOSS",
        };
        f.write_str(label)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by one tick.
    Tick,
    /// Requests placement of a tower on a free grid cell.
    PlaceTower {
        /// Cell the tower occupies.
        position: Position,
        /// Health removed from the locked target per tick.
        damage: f64,
        /// Euclidean reach of the tower.
        range: f64,
    },
    /// Relocates a living alien to the provided position.
    MoveAlien {
        /// Alien being moved.
        alien: AlienId,
        /// Destination computed by the motion model.
        position: Position,
    },
    /// Replaces a tower's target lock.
    LockTarget {
        /// Tower whose lock changes.
        tower: TowerId,
        /// New lock state.
        lock: TargetLock,
    },
    /// Applies one tick of tower fire to an alien.
    DamageAlien {
        /// Tower that fired.
        tower: TowerId,
        /// Alien that was hit.
        alien: AlienId,
        /// Health removed from the alien.
        damage: f64,
    },
    /// Marks every alien whose health dropped to zero or below as dead.
    ResolveDeaths,
    /// Declares a win when every alien is dead.
    EvaluateOutcome,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick that just started.
        tick: u64,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        position: Position,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        position: Position,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an alien changed position.
    AlienMoved {
        /// Alien that moved.
        alien: AlienId,
        /// Position held before the move.
        from: Position,
        /// Position held after the move.
        to: Position,
    },
    /// Reports that an alien reached the terminal sentinel.
    AlienBreached {
        /// Alien that breached.
        alien: AlienId,
    },
    /// Announces that a tower acquired a new target.
    TargetLocked {
        /// Tower that locked on.
        tower: TowerId,
        /// Alien now targeted.
        alien: AlienId,
    },
    /// Announces that a tower dropped its target.
    TargetReleased {
        /// Tower whose lock was cleared.
        tower: TowerId,
        /// Alien that was previously targeted.
        alien: AlienId,
    },
    /// Confirms that tower fire hit an alien.
    AlienDamaged {
        /// Tower that fired.
        tower: TowerId,
        /// Alien that was hit.
        alien: AlienId,
        /// Health remaining after the hit.
        health: f64,
    },
    /// Reports that an alien died.
    AlienKilled {
        /// Alien that died.
        alien: AlienId,
    },
    /// Announces the terminal outcome of the run.
    OutcomeDecided {
        /// Terminal outcome.
        outcome: Outcome,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell belongs to the alien path.
    OnPath,
    /// Another tower already occupies the cell.
    Occupied,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::OutOfBounds => "cell lies outside the grid",
            Self::OnPath => "cell belongs to the alien path",
            Self::Occupied => "cell already holds a tower",
        };
        f.write_str(reason)
    }
}

/// Immutable representation of a single alien's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienSnapshot {
    /// Roster index of the alien.
    pub id: AlienId,
    /// Current position, [`Position::OFF_BOARD`] before spawning.
    pub position: Position,
    /// Remaining health.
    pub health: f64,
    /// Path steps travelled per tick.
    pub speed: f64,
    /// First tick on which the alien is on the board.
    pub spawn_tick: u64,
    /// Indicates whether the alien has been destroyed.
    pub dead: bool,
}

impl AlienSnapshot {
    /// Reports whether towers may lock onto the alien.
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        !self.dead && !self.position.is_sentinel()
    }
}

/// Read-only snapshot describing the alien roster.
#[derive(Clone, Debug, Default)]
pub struct AlienView {
    snapshots: Vec<AlienSnapshot>,
}

impl AlienView {
    /// Creates a new alien view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AlienSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured alien snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &AlienSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single alien.
    #[must_use]
    pub fn get(&self, alien: AlienId) -> Option<&AlienSnapshot> {
        self.snapshots
            .binary_search_by_key(&alien, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of aliens in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AlienSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub position: Position,
    /// Health removed from the target per tick.
    pub damage: f64,
    /// Euclidean reach of the tower.
    pub range: f64,
    /// Current target lock.
    pub lock: TargetLock,
}

/// Read-only snapshot describing all towers placed in the level.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{AlienId, Bounds, Heading, Outcome, Path, PathCommand, Position, TargetLock};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn euclidean_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, 5);
        assert!((origin.distance_to(destination) - 5.0).abs() < f64::EPSILON);
        assert!((destination.distance_to(origin) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn turning_wraps_in_both_directions() {
        assert_eq!(Heading::East.turned(1), Heading::South);
        assert_eq!(Heading::North.turned(-1), Heading::West);
        assert_eq!(Heading::West.turned(5), Heading::North);
        assert_eq!(Heading::South.turned(-6), Heading::North);
        assert_eq!(Heading::from_index(1), Heading::East);
        assert_eq!(Heading::from_index(6), Heading::South);
    }

    #[test]
    fn clamp_keeps_positions_inside_bounds() {
        let bounds = Bounds::new(5, 3);
        assert_eq!(bounds.clamp(Position::new(-1, 4)), Position::new(0, 3));
        assert_eq!(bounds.clamp(Position::new(6, -2)), Position::new(5, 0));
        assert_eq!(bounds.clamp(Position::new(2, 2)), Position::new(2, 2));
    }

    #[test]
    fn bounds_enumerate_cells_column_major() {
        let bounds = Bounds::new(1, 1);
        let cells: Vec<_> = bounds.cells().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
        assert_eq!(Bounds::new(-1, 3).cells().count(), 0);
    }

    #[test]
    fn path_appends_sentinel_once_and_clamps_lookups() {
        let path = Path::new(vec![Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.cells(), &[Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(path.get(2), Position::BREACH);
        assert_eq!(path.get(usize::MAX), Position::BREACH);
    }

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(Position::BREACH, Position::OFF_BOARD);
        assert!(Position::BREACH.is_sentinel());
        assert!(Position::OFF_BOARD.is_sentinel());
        assert!(!Position::new(0, 0).is_sentinel());
    }

    #[test]
    fn outcome_labels_match_report_format() {
        assert_eq!(Outcome::Win.to_string(), "WIN");
        assert_eq!(Outcome::Loss.to_string(), "LOSS");
        assert_eq!(Outcome::Pending.to_string(), "PENDING");
        assert!(!Outcome::Pending.is_terminal());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn target_lock_round_trips_through_bincode() {
        assert_round_trip(&TargetLock::Locked(AlienId::new(3)));
        assert_round_trip(&TargetLock::Unlocked);
    }

    #[test]
    fn path_command_round_trips_through_bincode() {
        assert_round_trip(&PathCommand::Turn(-3));
    }
}
