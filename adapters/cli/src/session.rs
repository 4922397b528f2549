//! Scripted play session wiring the control panel, world and animator.

use std::time::Duration;

use anyhow::{bail, Result};
use path_puzzle_core::{Command, Event, GameState, LevelSpec, ProgressSnapshot, SessionConfig};
use path_puzzle_system_controls::{Button, ControlPanel};
use path_puzzle_world::{self as world, query, World};
use tracing::{debug, info};

use crate::animator::Animator;

/// Summary of a finished scripted session.
#[derive(Clone, Debug)]
pub(crate) struct Outcome {
    /// Final progress of the player.
    pub(crate) progress: ProgressSnapshot,
    /// Number of levels completed during the script.
    pub(crate) completed: usize,
    /// Number of commands the world rejected.
    pub(crate) rejected: usize,
    /// Whether the character is drawn at the end of the script.
    pub(crate) visible: bool,
}

/// Headless session that plays taps the way the touch UI would.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    panel: ControlPanel,
    animator: Animator,
    frame: Duration,
    max_frames: usize,
    pending: Vec<Event>,
    completed: usize,
    rejected: usize,
}

impl Session {
    /// Creates a session and announces the first level.
    pub(crate) fn new(
        config: SessionConfig,
        levels: Vec<LevelSpec>,
        frame: Duration,
        max_frames: usize,
    ) -> Result<Self> {
        if frame.is_zero() {
            bail!("frame duration must be positive");
        }
        let panel = ControlPanel::new(&config);
        let world = World::new(config, levels)?;
        info!("{}", query::welcome_banner(&world));

        let mut pending = Vec::new();
        world::announce_level(&world, &mut pending);

        Ok(Self {
            world,
            panel,
            animator: Animator::new(),
            frame,
            max_frames,
            pending,
            completed: 0,
            rejected: 0,
        })
    }

    /// Plays every tap in order and lets the world settle after each one.
    pub(crate) fn play(mut self, taps: &[Button]) -> Result<Outcome> {
        for &tap in taps {
            self.tap(tap);
            self.settle()?;
        }
        Ok(Outcome {
            progress: query::progress(&self.world),
            completed: self.completed,
            rejected: self.rejected,
            visible: self.animator.is_visible(),
        })
    }

    fn tap(&mut self, tap: Button) {
        let events = std::mem::take(&mut self.pending);
        let mut commands = Vec::new();
        self.panel.handle(&events, Some(tap), &mut commands);
        debug!(%tap, commands = commands.len(), "tap handled");
        for command in commands {
            self.apply(command);
        }
    }

    fn settle(&mut self) -> Result<()> {
        for _ in 0..self.max_frames {
            if self.is_settled() {
                return Ok(());
            }
            self.step();
        }
        bail!(
            "session did not settle within {} frames in state {}",
            self.max_frames,
            query::state(&self.world)
        );
    }

    fn is_settled(&self) -> bool {
        query::state(&self.world) != GameState::Running
            && self.animator.is_idle()
            && !query::has_pending_effects(&self.world)
    }

    fn step(&mut self) {
        self.apply(Command::Tick { dt: self.frame });
        if let Some((x, z)) = self.animator.advance(self.frame) {
            self.apply(Command::SamplePosition { x, z });
        }
    }

    fn apply(&mut self, command: Command) {
        let start = self.pending.len();
        world::apply(&mut self.world, command, &mut self.pending);
        let produced = &self.pending[start..];
        self.animator.observe(produced);
        for event in produced {
            match event {
                Event::CommandRejected { .. } => self.rejected += 1,
                Event::StateChanged {
                    to: GameState::Complete,
                    ..
                } => self.completed += 1,
                _ => {}
            }
            info!(?event, "world event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_puzzle_core::{CellCoord, ExecutionMode, Facing};

    const FRAME: Duration = Duration::from_millis(16);

    fn straight() -> Vec<LevelSpec> {
        vec![LevelSpec::new(
            Facing::East,
            vec![
                CellCoord::new(3, 0),
                CellCoord::new(3, 1),
                CellCoord::new(3, 2),
            ],
        )]
    }

    fn play(config: SessionConfig, taps: &[Button]) -> Outcome {
        Session::new(config, straight(), FRAME, 10_000)
            .expect("session")
            .play(taps)
            .expect("settled")
    }

    #[test]
    fn animated_run_reaches_goal() {
        let outcome = play(
            SessionConfig::default(),
            &[Button::Forward, Button::Forward, Button::Context],
        );
        assert_eq!(outcome.progress.state, GameState::Complete);
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.rejected, 0);
    }

    #[test]
    fn walking_off_the_path_fails_and_hides_character() {
        let outcome = play(
            SessionConfig::default(),
            &[Button::TurnRight, Button::Forward, Button::Context],
        );
        assert_eq!(outcome.progress.state, GameState::Failed);
        assert!(!outcome.visible);
    }

    #[test]
    fn retry_after_failure_restarts_level() {
        let outcome = play(
            SessionConfig::default(),
            &[
                Button::TurnLeft,
                Button::Forward,
                Button::Context,
                Button::Context,
            ],
        );
        assert_eq!(outcome.progress.state, GameState::Start);
        assert_eq!(outcome.progress.blocks_used, 0);
        assert!(outcome.visible);
    }

    #[test]
    fn immediate_mode_moves_on_every_tap() {
        let config = SessionConfig {
            execution: ExecutionMode::Immediate,
            ..SessionConfig::default()
        };
        let outcome = play(config, &[Button::Forward, Button::Forward]);
        assert_eq!(outcome.progress.state, GameState::Complete);
    }

    #[test]
    fn last_motion_lands_before_the_run_is_exhausted() {
        for step_interval_ms in [400, 500, 1_000] {
            let config = SessionConfig {
                step_interval_ms,
                ..SessionConfig::default()
            };
            let outcome = play(config, &[Button::Forward, Button::Forward, Button::Context]);
            assert_eq!(
                outcome.progress.state,
                GameState::Complete,
                "step interval {step_interval_ms} ms"
            );
        }
    }

    #[test]
    fn step_interval_shorter_than_motion_fails_setup() {
        for step_interval_ms in [0, 300] {
            let config = SessionConfig {
                step_interval_ms,
                ..SessionConfig::default()
            };
            assert!(Session::new(config, straight(), FRAME, 10_000).is_err());
        }
    }

    #[test]
    fn zero_frame_is_rejected() {
        assert!(Session::new(SessionConfig::default(), straight(), Duration::ZERO, 1).is_err());
    }
}
