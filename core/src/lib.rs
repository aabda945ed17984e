#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scavenge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Scavenge. Survive the days.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the session on to the next day.
    AdvanceDay,
    /// Discards every placed tile and empties the actor registry.
    ClearLevel,
    /// Places a static tile on the board.
    PlaceTile {
        /// Tile that should appear on the board.
        placement: TilePlacement,
    },
    /// Places a turn-taking actor and registers it for the actor turn.
    SpawnActor {
        /// Tile representing the actor on the board.
        placement: TilePlacement,
        /// Time the scheduler waits after activating the actor.
        move_duration: Duration,
    },
    /// Requests that the session enter the provided turn state.
    EnterTurnState {
        /// State the session should adopt.
        state: TurnState,
    },
    /// Signals that the player completed exactly one legal action.
    ConsumePlayerTurn,
    /// Asks the actor collaborator to advance the actor by one step.
    ActivateActor {
        /// Identifier of the actor taking its step.
        actor: ActorId,
    },
    /// Adds the provided amount to the player's food points.
    AdjustFood {
        /// Signed change applied to the current food total.
        delta: i32,
    },
    /// Signals that the player reached the exit and the next day should load.
    CompleteLevel,
    /// Ends the session with the provided outcome.
    DeclareGameOver {
        /// Final outcome shown to the player.
        outcome: Outcome,
    },
    /// Records that the level for a day could not be built.
    ReportLevelLoadFailure {
        /// Day whose level failed to load.
        day: u32,
        /// Human readable description of the failure.
        reason: String,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new day began.
    DayAdvanced {
        /// Day that is now current.
        day: u32,
    },
    /// Confirms that the previous level's tiles and actors were discarded.
    LevelCleared,
    /// Confirms that a tile was placed on the board.
    TilePlaced {
        /// Tile that was placed.
        placement: TilePlacement,
    },
    /// Confirms that an actor was spawned and registered.
    ActorSpawned {
        /// Identifier assigned to the actor by the world.
        actor: ActorId,
        /// Cell the actor occupies after spawning.
        position: GridPosition,
        /// Time the scheduler waits after activating the actor.
        move_duration: Duration,
    },
    /// Announces that the session entered a new turn state.
    TurnStateChanged {
        /// State that became active.
        state: TurnState,
    },
    /// Confirms that the player's action ended the player turn.
    PlayerTurnConsumed,
    /// Reports that a player action arrived while the player could not act.
    PlayerActionRejected {
        /// State the session was in when the action arrived.
        state: TurnState,
    },
    /// Requests that the actor collaborator advance the actor by one step.
    ActorActivated {
        /// Identifier of the actor taking its step.
        actor: ActorId,
    },
    /// Reports the player's food total after an adjustment.
    FoodChanged {
        /// Food points remaining.
        food: i32,
    },
    /// Reports that the level for a day could not be built.
    LevelLoadFailed {
        /// Day whose level failed to load.
        day: u32,
        /// Human readable description of the failure.
        reason: String,
    },
    /// Announces that the session ended.
    GameOver {
        /// Final outcome of the session.
        outcome: Outcome,
    },
}

/// Location of a single board cell. The outer wall ring sits at -1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    x: i32,
    y: i32,
}

impl GridPosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, growing upwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Meaning of a single cell in a text level description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable ground. Every unrecognised symbol maps here.
    Floor,
    /// Destructible inner wall, written as `x`.
    Wall,
    /// Food pickup, written as `F`.
    Food,
    /// Turn-taking enemy, written as `E`.
    Enemy,
    /// Level exit, written as `T`.
    Exit,
}

impl TileKind {
    /// Maps a layout symbol onto its tile kind.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            'x' => Self::Wall,
            'F' => Self::Food,
            'E' => Self::Enemy,
            'T' => Self::Exit,
            _ => Self::Floor,
        }
    }

    /// Category placed on top of the floor for this kind, if any.
    #[must_use]
    pub const fn category(self) -> Option<TileCategory> {
        match self {
            Self::Floor => None,
            Self::Wall => Some(TileCategory::Wall),
            Self::Food => Some(TileCategory::Food),
            Self::Enemy => Some(TileCategory::Enemy),
            Self::Exit => Some(TileCategory::Exit),
        }
    }
}

/// Named group of interchangeable visual variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCategory {
    /// Ground tiles.
    Floor,
    /// Indestructible tiles forming the border ring.
    OuterWall,
    /// Inner wall tiles.
    Wall,
    /// Food pickups.
    Food,
    /// Enemies that take part in the actor turn.
    Enemy,
    /// The single exit entity.
    Exit,
}

/// Index of one variant within a [`TileCategory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileVariant(u32);

impl TileVariant {
    /// Creates a new variant index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the variant.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Request to place one entity of a category variant at a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Category the placed entity belongs to.
    pub category: TileCategory,
    /// Variant chosen within the category.
    pub variant: TileVariant,
    /// Cell the entity occupies.
    pub position: GridPosition,
}

impl TilePlacement {
    /// Creates a new placement descriptor.
    #[must_use]
    pub const fn new(category: TileCategory, variant: TileVariant, position: GridPosition) -> Self {
        Self {
            category,
            variant,
            position,
        }
    }
}

/// Closed integer range used to parameterise random quantities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCount")]
pub struct Count {
    minimum: u32,
    maximum: u32,
}

impl Count {
    /// Creates a range, rejecting a minimum above the maximum.
    pub const fn new(minimum: u32, maximum: u32) -> Result<Self, CountError> {
        if minimum > maximum {
            return Err(CountError { minimum, maximum });
        }
        Ok(Self { minimum, maximum })
    }

    /// Creates a range containing only `value`.
    #[must_use]
    pub const fn exactly(value: u32) -> Self {
        Self {
            minimum: value,
            maximum: value,
        }
    }

    /// Smallest quantity the range allows.
    #[must_use]
    pub const fn minimum(&self) -> u32 {
        self.minimum
    }

    /// Largest quantity the range allows.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Reports whether `value` lies within the range.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.minimum && value <= self.maximum
    }
}

#[derive(Deserialize)]
struct RawCount {
    minimum: u32,
    maximum: u32,
}

impl TryFrom<RawCount> for Count {
    type Error = CountError;

    fn try_from(raw: RawCount) -> Result<Self, Self::Error> {
        Self::new(raw.minimum, raw.maximum)
    }
}

/// Raised when a [`Count`] would have its minimum above its maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("count minimum {minimum} exceeds maximum {maximum}")]
pub struct CountError {
    /// Requested lower bound.
    pub minimum: u32,
    /// Requested upper bound.
    pub maximum: u32,
}

/// Unique identifier assigned to a spawned actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
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

/// Whose turn it is. Exactly one value holds at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// The level is being built and the title card is up.
    Setup,
    /// The player may perform one action.
    PlayerTurn,
    /// Actors are stepping in registration order.
    ActorTurn,
    /// The session has ended; no further transitions happen.
    GameOver,
}

impl TurnState {
    /// Reports whether player input must be rejected in this state.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Setup | Self::ActorTurn)
    }
}

/// Final result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player outlasted every available day.
    Survived {
        /// Number of days completed.
        days: u32,
    },
    /// The player ran out of food.
    Starved {
        /// Day on which the food ran out.
        days: u32,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survived { days } => write!(f, "You survived {days} days!"),
            Self::Starved { days } => write!(f, "After {days} days, you starved."),
        }
    }
}

/// Immutable representation of a registered actor used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorSnapshot {
    /// Identifier assigned to the actor.
    pub id: ActorId,
    /// Cell the actor was spawned on.
    pub position: GridPosition,
    /// Time the scheduler waits after activating the actor.
    pub move_duration: Duration,
}

/// Read-only snapshot of the actor registry in activation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new view; the provided order is the activation order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ActorSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in activation order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot at the provided activation index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActorSnapshot> {
        self.snapshots.get(index)
    }

    /// Number of registered actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no actor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Immutable copy of the session state that persists across levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current day; zero before the first level is built.
    pub day: u32,
    /// Player food points.
    pub food: i32,
    /// Active turn state.
    pub state: TurnState,
}

#[cfg(test)]
mod tests {
    use super::{Count, GridPosition, Outcome, TileCategory, TileKind, TilePlacement, TileVariant};

    #[test]
    fn symbols_map_to_expected_kinds() {
        assert_eq!(TileKind::from_symbol('x'), TileKind::Wall);
        assert_eq!(TileKind::from_symbol('F'), TileKind::Food);
        assert_eq!(TileKind::from_symbol('E'), TileKind::Enemy);
        assert_eq!(TileKind::from_symbol('T'), TileKind::Exit);
        assert_eq!(TileKind::from_symbol(' '), TileKind::Floor);
        assert_eq!(TileKind::from_symbol('X'), TileKind::Floor);
        assert_eq!(TileKind::from_symbol('\r'), TileKind::Floor);
    }

    #[test]
    fn floor_has_no_overlay_category() {
        assert_eq!(TileKind::Floor.category(), None);
        assert_eq!(TileKind::Exit.category(), Some(TileCategory::Exit));
    }

    #[test]
    fn count_rejects_inverted_range() {
        assert!(Count::new(3, 2).is_err());
        let count = Count::new(2, 2).expect("equal bounds are valid");
        assert!(count.contains(2));
        assert!(!count.contains(3));
    }

    #[test]
    fn outcome_messages_name_the_day_count() {
        assert_eq!(
            Outcome::Survived { days: 3 }.to_string(),
            "You survived 3 days!"
        );
        assert_eq!(
            Outcome::Starved { days: 2 }.to_string(),
            "After 2 days, you starved."
        );
    }

    #[test]
    fn tile_placement_round_trips_through_bincode() {
        let placement = TilePlacement::new(
            TileCategory::OuterWall,
            TileVariant::new(3),
            GridPosition::new(-1, 8),
        );
        let bytes = bincode::serialize(&placement).expect("serialize");
        let restored: TilePlacement = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, placement);
    }

    #[test]
    fn count_deserialization_validates_bounds() {
        let bytes = bincode::serialize(&(5_u32, 9_u32)).expect("serialize");
        let count: Count = bincode::deserialize(&bytes).expect("valid range");
        assert_eq!((count.minimum(), count.maximum()), (5, 9));

        let inverted = bincode::serialize(&(9_u32, 5_u32)).expect("serialize");
        assert!(bincode::deserialize::<Count>(&inverted).is_err());
    }
}
