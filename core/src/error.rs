//! Error taxonomy shared by the compiler, the world and adapters.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GameState;

/// Reasons a single level description cannot be compiled against the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum LevelError {
    /// The level path does not contain any cells.
    #[error("level path contains no cells")]
    EmptyPath,
    /// A path entry references a cell outside the generated grid.
    #[error("cell [{row}, {column}] lies outside the {axis_len}x{axis_len} grid")]
    IndexOutOfRange {
        /// Row index supplied by the level data.
        row: u32,
        /// Column index supplied by the level data.
        column: u32,
        /// Number of cells along each grid axis.
        axis_len: usize,
    },
    /// The path needs more platforms than the scene provides.
    #[error("level path needs {required} platforms but only {available} slots exist")]
    TooManyPlatforms {
        /// Number of platforms the path would occupy.
        required: usize,
        /// Number of platform slots configured for the session.
        available: usize,
    },
}

/// Reasons the level catalog cannot be loaded at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No level descriptions were supplied.
    #[error("level catalog contains no levels")]
    Empty,
    /// A level failed to compile.
    #[error("level {index} is invalid")]
    InvalidLevel {
        /// Zero-based position of the level within the catalog.
        index: usize,
        /// Underlying compilation failure.
        #[source]
        source: LevelError,
    },
}

/// Reasons a session configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid increment is zero, negative or not a number.
    #[error("grid increment must be positive, got {0}")]
    NonPositiveIncrement(f64),
    /// The grid increment is not a whole number of ten-thousandths, so
    /// neighbouring cells would round onto the same coordinate.
    #[error("grid increment {0} is not a whole multiple of 0.0001")]
    SubPrecisionIncrement(f64),
    /// The half extent is negative or not a number.
    #[error("grid half extent must not be negative, got {0}")]
    NegativeExtent(f64),
    /// The half extent is not a whole number of increments.
    #[error("half extent {half_extent} is not a whole multiple of increment {increment}")]
    MisalignedExtent {
        /// Configured half extent.
        half_extent: f64,
        /// Configured increment.
        increment: f64,
    },
    /// The grid would have more cells per axis than the engine allows.
    #[error("half extent {half_extent} at increment {increment} exceeds {max_axis_len} cells per axis")]
    GridTooLarge {
        /// Configured half extent.
        half_extent: f64,
        /// Configured increment.
        increment: f64,
        /// Largest accepted number of cells per axis.
        max_axis_len: usize,
    },
    /// The command queue would not accept any moves.
    #[error("max_blocks must be at least 1")]
    ZeroCapacity,
    /// The collision tolerance is negative or not a number.
    #[error("tolerance must not be negative, got {0}")]
    NegativeTolerance(f64),
    /// Moves would be dispatched before the previous animation finished.
    #[error("step_interval_ms ({step_interval_ms}) must be positive and at least motion_duration_ms ({motion_duration_ms})")]
    StepShorterThanMotion {
        /// Configured delay between dispatches.
        step_interval_ms: u64,
        /// Configured animation length.
        motion_duration_ms: u64,
    },
}

/// Failures raised while constructing a world.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SetupError {
    /// The session configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The level catalog failed validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Player-facing requests that the state machine may accept or reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Request {
    /// Append a movement command to the queue.
    EnqueueMove,
    /// Remove the most recently queued movement command.
    UndoMove,
    /// Start executing the queued commands.
    Run,
    /// Restart the current level.
    ResetLevel,
    /// Move on to the next level.
    AdvanceLevel,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EnqueueMove => "enqueue a move",
            Self::UndoMove => "undo a move",
            Self::Run => "run the queue",
            Self::ResetLevel => "reset the level",
            Self::AdvanceLevel => "advance to the next level",
        };
        f.write_str(label)
    }
}

/// Recoverable rejections reported by the world while applying commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuleError {
    /// A level could not be compiled while switching levels.
    #[error(transparent)]
    Level(#[from] LevelError),
    /// The command queue already holds its maximum number of moves.
    #[error("command queue is full ({capacity} blocks)")]
    QueueFull {
        /// Maximum number of moves the queue accepts.
        capacity: usize,
    },
    /// Undo was requested with nothing queued.
    #[error("command queue is empty")]
    EmptyQueue,
    /// The request is not permitted in the current state.
    #[error("cannot {request} while the level is {state}")]
    InvalidTransition {
        /// State the world was in when the request arrived.
        state: GameState,
        /// Request that was refused.
        request: Request,
    },
}

/// Error returned when a textual move name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown move `{0}`")]
pub struct ParseMoveError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_state_and_request() {
        let error = RuleError::InvalidTransition {
            state: GameState::Running,
            request: Request::ResetLevel,
        };
        assert_eq!(
            error.to_string(),
            "cannot reset the level while the level is running"
        );
    }

    #[test]
    fn catalog_error_exposes_level_source() {
        use std::error::Error as _;

        let error = CatalogError::InvalidLevel {
            index: 2,
            source: LevelError::EmptyPath,
        };
        assert_eq!(error.to_string(), "level 2 is invalid");
        let source = error.source().expect("source");
        assert_eq!(source.to_string(), "level path contains no cells");
    }
}
