#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Puzzle rules engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player input, position samples and elapsed time; the world
//! executes those commands via its `apply` entry point and broadcasts
//! [`Event`] values describing every state transition and presentation side
//! effect. Systems consume event streams and respond with new commands.

mod config;
mod error;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub use config::{ExecutionMode, SessionConfig, MAX_AXIS_LEN};
pub use error::{
    CatalogError, ConfigError, LevelError, ParseMoveError, Request, RuleError, SetupError,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Puzzle.";

/// Scale used to round coordinates to four decimal places.
const COORDINATE_SCALE: f64 = 10_000.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock, firing due dispatches and delayed effects.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Appends a movement command to the queue.
    EnqueueMove {
        /// Movement the player selected.
        action: Move,
    },
    /// Removes the most recently queued movement command.
    UndoMove,
    /// Starts executing the queued movement commands.
    Run,
    /// Reports the character's current position on the ground plane.
    SamplePosition {
        /// Position along the x axis in world units.
        x: f64,
        /// Position along the z axis in world units.
        z: f64,
    },
    /// Restarts the current level.
    ResetLevel,
    /// Loads the next level after the current one was completed.
    AdvanceLevel,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a level was laid out and the character placed at its start.
    LevelLoaded {
        /// Zero-based index of the level within the catalog.
        level: usize,
        /// Initial facing of the character.
        facing: Facing,
        /// Cell the character starts on.
        start: Coordinate,
        /// Cell holding the goal obstacle.
        goal: Coordinate,
        /// Initial yaw of the character in degrees.
        yaw_degrees: f64,
    },
    /// Places a platform slot on a path cell.
    PlatformPlaced {
        /// Index of the platform slot being used.
        slot: usize,
        /// Cell the platform covers.
        at: Coordinate,
    },
    /// Hides every platform slot before a new level is laid out.
    PlatformsCleared {
        /// Number of platform slots that were hidden.
        slots: usize,
    },
    /// Confirms that a movement command was appended to the queue.
    MoveQueued {
        /// Queue position, which doubles as the visual block slot.
        slot: usize,
        /// Movement that was queued.
        action: Move,
    },
    /// Confirms that the most recent movement command was removed.
    MoveUndone {
        /// Queue position that became free.
        slot: usize,
        /// Movement that was removed.
        action: Move,
    },
    /// Reports that every queued movement command was discarded.
    QueueCleared,
    /// Announces a state machine transition.
    StateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// Requests that the animation collaborator play a single movement.
    MotionStarted {
        /// Movement being executed.
        action: Move,
        /// Position before the movement.
        from: Coordinate,
        /// Position after the movement.
        to: Coordinate,
        /// Facing after the movement.
        facing: Facing,
        /// Yaw change in degrees, positive for counter-clockwise turns.
        rotation_degrees: f64,
        /// Duration the animation should take.
        duration: Duration,
    },
    /// Pins the character to the cell that produced a verdict.
    CharacterSnapped {
        /// Cell the character was pinned to.
        at: Coordinate,
    },
    /// Makes the character visible again.
    CharacterShown,
    /// Hides the character after it fell.
    CharacterHidden,
    /// Hides the goal obstacle once the goal was reached.
    ObstacleHidden,
    /// Shows the goal obstacle again when a level is (re)initialized.
    ObstacleShown,
    /// Swaps the face of the context button.
    ButtonTextureChanged {
        /// Texture to display.
        texture: ButtonTexture,
    },
    /// Reports that a request was refused without changing state.
    CommandRejected {
        /// Request that was refused.
        request: Request,
        /// Specific reason the request failed.
        reason: RuleError,
    },
}

/// Position on the ground plane rounded to four decimal places.
///
/// Rounding happens on construction so that independently computed positions
/// compare equal whenever they describe the same grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    x: f64,
    z: f64,
}

impl Coordinate {
    /// Creates a coordinate, rounding both components to four decimal places.
    #[must_use]
    pub fn rounded(x: f64, z: f64) -> Self {
        Self {
            x: round_to_precision(x),
            z: round_to_precision(z),
        }
    }

    /// Position along the x axis.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Position along the z axis.
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }

    /// Returns the coordinate displaced by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f64, dz: f64) -> Self {
        Self::rounded(self.x + dx, self.z + dz)
    }

    /// Exact integer key identifying the rounded coordinate.
    #[must_use]
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey {
            x: (self.x * COORDINATE_SCALE).round() as i64,
            z: (self.z * COORDINATE_SCALE).round() as i64,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.z)
    }
}

fn round_to_precision(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// Hashable identity of a [`Coordinate`] expressed in ten-thousandths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    x: i64,
    z: i64,
}

/// Location of a grid cell expressed as row and column indices.
///
/// Level data stores cells as `[row, column]` pairs; the row selects the x
/// position and the column selects the z position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl From<[u32; 2]> for CellCoord {
    fn from([row, column]: [u32; 2]) -> Self {
        Self::new(row, column)
    }
}

impl From<CellCoord> for [u32; 2] {
    fn from(cell: CellCoord) -> Self {
        [cell.row, cell.column]
    }
}

/// Compass orientation of the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Looking toward increasing x.
    North,
    /// Looking toward decreasing x.
    South,
    /// Looking toward increasing z.
    East,
    /// Looking toward decreasing z.
    West,
}

impl Facing {
    /// Every facing, in declaration order.
    pub const ALL: [Facing; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Yaw the character is given when a level starts with this facing.
    #[must_use]
    pub const fn yaw_degrees(self) -> f64 {
        match self {
            Self::East => 0.0,
            Self::North => 90.0,
            Self::West => 180.0,
            Self::South => 270.0,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        f.write_str(label)
    }
}

/// Movement command a player can queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Step one cell in the current facing.
    #[serde(rename = "forward")]
    Forward,
    /// Rotate a quarter turn counter-clockwise.
    #[serde(rename = "left", alias = "turn-left")]
    TurnLeft,
    /// Rotate a quarter turn clockwise.
    #[serde(rename = "right", alias = "turn-right")]
    TurnRight,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Forward => "forward",
            Self::TurnLeft => "left",
            Self::TurnRight => "right",
        };
        f.write_str(label)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" | "f" => Ok(Self::Forward),
            "left" | "turn-left" | "l" => Ok(Self::TurnLeft),
            "right" | "turn-right" | "r" => Ok(Self::TurnRight),
            _ => Err(ParseMoveError(value.to_owned())),
        }
    }
}

/// Lifecycle state of the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    /// Accepting movement commands.
    Start,
    /// Executing movement commands.
    Running,
    /// The character reached the goal.
    Complete,
    /// The character stepped onto a hazard.
    Failed,
    /// Every command executed without reaching the goal or a hazard.
    Uncomplete,
}

impl GameState {
    /// Reports whether movement commands may be queued or undone.
    #[must_use]
    pub const fn accepts_moves(self) -> bool {
        matches!(self, Self::Start)
    }

    /// Reports whether the level reached a verdict that needs a reset or advance.
    #[must_use]
    pub const fn is_verdict(self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Uncomplete)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::Uncomplete => "uncomplete",
        };
        f.write_str(label)
    }
}

/// Symbolic textures shown on the context button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonTexture {
    /// Shown while commands can be queued and run.
    Play,
    /// Shown after a failed or incomplete attempt.
    Retry,
    /// Shown after the goal was reached.
    Next,
}

impl ButtonTexture {
    /// Name of the texture asset the presentation layer should display.
    #[must_use]
    pub const fn texture_name(self) -> &'static str {
        match self {
            Self::Play => "btn_play",
            Self::Retry => "btn_retry",
            Self::Next => "btn_next",
        }
    }
}

/// Declarative description of a single level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelSpec {
    facing: Facing,
    path: Vec<CellCoord>,
}

impl LevelSpec {
    /// Creates a level description from its initial facing and path cells.
    #[must_use]
    pub fn new(facing: Facing, path: Vec<CellCoord>) -> Self {
        Self { facing, path }
    }

    /// Facing the character starts the level with.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Ordered cells forming the route from start to goal.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }
}

/// Immutable snapshot of the player's progress used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSnapshot {
    /// Zero-based index of the active level.
    pub level_index: usize,
    /// Current facing of the character.
    pub facing: Facing,
    /// Current lifecycle state.
    pub state: GameState,
    /// Number of queued movement commands.
    pub blocks_used: usize,
    /// Number of movement commands that can still be queued.
    pub blocks_available: usize,
    /// Logical position of the character.
    pub position: Coordinate,
    /// Accumulated yaw of the character in degrees.
    pub yaw_degrees: f64,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Coordinate, Facing, GameState, LevelSpec, Move, RuleError};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn rule_error_round_trips_through_bincode() {
        assert_round_trip(&RuleError::InvalidTransition {
            state: GameState::Complete,
            request: super::Request::ResetLevel,
        });
    }

    #[test]
    fn rounding_removes_accumulated_drift() {
        let drifted = Coordinate::rounded(0.1 + 0.2, -0.36 + 3.0 * 0.12);
        let exact = Coordinate::rounded(0.3, 0.0);
        assert_eq!(drifted, exact);
        assert_eq!(drifted.key(), exact.key());
    }

    #[test]
    fn negative_zero_shares_key_with_zero() {
        assert_eq!(
            Coordinate::rounded(-0.000_01, 0.0).key(),
            Coordinate::rounded(0.0, 0.0).key()
        );
    }

    #[test]
    fn level_spec_reads_index_pairs_from_toml() {
        let spec: LevelSpec = toml::from_str(
            r#"
                facing = "east"
                path = [[0, 0], [0, 1], [0, 2]]
            "#,
        )
        .expect("parse level");

        assert_eq!(spec.facing(), Facing::East);
        assert_eq!(
            spec.path(),
            &[
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(0, 2)
            ]
        );
    }

    #[test]
    fn move_parses_short_and_long_names() {
        assert_eq!("F".parse::<Move>(), Ok(Move::Forward));
        assert_eq!("turn-left".parse::<Move>(), Ok(Move::TurnLeft));
        assert_eq!(" right ".parse::<Move>(), Ok(Move::TurnRight));
        assert!("jump".parse::<Move>().is_err());
    }

    #[test]
    fn only_start_accepts_moves() {
        assert!(GameState::Start.accepts_moves());
        assert!(!GameState::Running.accepts_moves());
        assert!(GameState::Uncomplete.is_verdict());
        assert!(!GameState::Running.is_verdict());
    }
}
