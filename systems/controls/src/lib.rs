#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control-panel system translating button taps into world commands.
//!
//! The panel mirrors the small slice of world state it needs (lifecycle
//! state, queue usage and the context button texture) from the event stream,
//! so adapters never have to query the world to decide what a tap means.

use std::{fmt, str::FromStr};

use path_puzzle_core::{
    ButtonTexture, Command, Event, ExecutionMode, GameState, Move, SessionConfig,
};
use thiserror::Error;
use tracing::trace;

/// Buttons exposed by the control panel, in on-screen order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Queue a forward step.
    Forward,
    /// Queue a left turn.
    TurnLeft,
    /// Queue a right turn.
    TurnRight,
    /// Play, retry or next depending on the lifecycle state.
    Context,
    /// Remove the most recently queued move.
    Undo,
}

impl Button {
    /// Every button in on-screen order.
    pub const ALL: [Button; 5] = [
        Self::Forward,
        Self::TurnLeft,
        Self::TurnRight,
        Self::Context,
        Self::Undo,
    ];

    /// Resolves the zero-based on-screen index of a button.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Movement queued by the button, if it is a movement button.
    #[must_use]
    pub const fn movement(self) -> Option<Move> {
        match self {
            Self::Forward => Some(Move::Forward),
            Self::TurnLeft => Some(Move::TurnLeft),
            Self::TurnRight => Some(Move::TurnRight),
            Self::Context | Self::Undo => None,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Forward => "forward",
            Self::TurnLeft => "left",
            Self::TurnRight => "right",
            Self::Context => "context",
            Self::Undo => "undo",
        };
        f.write_str(label)
    }
}

/// Error returned when a button name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown button `{0}`, expected forward, left, right, context or undo")]
pub struct ParseButtonError(pub String);

impl FromStr for Button {
    type Err = ParseButtonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" | "f" => Ok(Self::Forward),
            "left" | "l" => Ok(Self::TurnLeft),
            "right" | "r" => Ok(Self::TurnRight),
            "context" | "go" | "c" => Ok(Self::Context),
            "undo" | "u" => Ok(Self::Undo),
            _ => Err(ParseButtonError(value.to_owned())),
        }
    }
}

/// Control-panel system that emits commands for button taps.
#[derive(Clone, Debug)]
pub struct ControlPanel {
    state: GameState,
    execution: ExecutionMode,
    capacity: usize,
    queued: usize,
    texture: ButtonTexture,
}

impl ControlPanel {
    /// Creates a panel for a fresh session using the session configuration.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            state: GameState::Start,
            execution: config.execution,
            capacity: config.max_blocks,
            queued: 0,
            texture: ButtonTexture::Play,
        }
    }

    /// Lifecycle state last observed by the panel.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Number of blocks the player may still queue.
    #[must_use]
    pub fn blocks_remaining(&self) -> usize {
        self.capacity.saturating_sub(self.queued)
    }

    /// Texture currently shown on the context button.
    #[must_use]
    pub const fn texture(&self) -> ButtonTexture {
        self.texture
    }

    /// Consumes world events and an optional tap to emit control commands.
    pub fn handle(&mut self, events: &[Event], tap: Option<Button>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::StateChanged { to, .. } => self.state = *to,
                Event::MoveQueued { slot, .. } => self.queued = slot + 1,
                Event::MoveUndone { slot, .. } => self.queued = *slot,
                Event::QueueCleared => self.queued = 0,
                Event::ButtonTextureChanged { texture } => self.texture = *texture,
                _ => {}
            }
        }

        let Some(button) = tap else {
            return;
        };

        let command = match (button, self.state) {
            (Button::Forward | Button::TurnLeft | Button::TurnRight, GameState::Start) => {
                button.movement().map(|action| Command::EnqueueMove { action })
            }
            (Button::Undo, GameState::Start)
                if self.queued > 0 && self.execution == ExecutionMode::Batch =>
            {
                Some(Command::UndoMove)
            }
            (Button::Context, GameState::Start) if self.execution == ExecutionMode::Batch => {
                Some(Command::Run)
            }
            (Button::Context, GameState::Failed | GameState::Uncomplete) => {
                Some(Command::ResetLevel)
            }
            (Button::Context, GameState::Complete) => Some(Command::AdvanceLevel),
            _ => None,
        };

        match command {
            Some(command) => out.push(command),
            None => trace!(%button, state = %self.state, "tap ignored"),
        }
    }
}
