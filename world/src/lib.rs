#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level progress and state machine for Path Puzzle.
//!
//! The [`World`] owns every piece of mutable session state: the active level,
//! the character's facing and position, the command queue, the run schedule
//! and pending delayed effects. All mutation goes through [`apply`], which
//! either performs a complete transition or rejects the command with
//! [`Event::CommandRejected`] and leaves the state untouched.

mod queue;
mod schedule;
mod timers;

use std::time::Duration;

use path_puzzle_core::{
    ButtonTexture, CatalogError, Command, Coordinate, Event, ExecutionMode, Facing, GameState,
    LevelSpec, Move, Request, RuleError, SessionConfig, SetupError, WELCOME_BANNER,
};
use path_puzzle_system_level_compiler::{build_grid, CompiledLevel, LevelCatalog};
use path_puzzle_system_movement as movement;
use path_puzzle_system_position_monitor::{Arrival, PositionMonitor};
use tracing::{debug, trace, warn};

pub use queue::CommandQueue;

use schedule::ExecutionClock;
use timers::{DelayedEffect, EffectTimers};

/// Progress through the active level.
#[derive(Debug)]
struct LevelProgress {
    facing: Facing,
    state: GameState,
    queue: CommandQueue,
    position: Coordinate,
    yaw_degrees: f64,
}

impl LevelProgress {
    fn for_level(level: &CompiledLevel, capacity: usize) -> Self {
        Self {
            facing: level.facing(),
            state: GameState::Start,
            queue: CommandQueue::with_capacity(capacity),
            position: level.path().start(),
            yaw_degrees: level.facing().yaw_degrees(),
        }
    }
}

/// Represents the authoritative Path Puzzle session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SessionConfig,
    catalog: LevelCatalog,
    level: CompiledLevel,
    monitor: PositionMonitor,
    progress: LevelProgress,
    execution: ExecutionClock,
    timers: EffectTimers,
}

impl World {
    /// Creates a session positioned at the start of the first level.
    ///
    /// Every level is compiled up front so malformed level data aborts
    /// loading instead of surfacing mid-session.
    pub fn new(config: SessionConfig, levels: Vec<LevelSpec>) -> Result<Self, SetupError> {
        config.validate()?;
        let grid = build_grid(config.half_extent, config.increment);
        let catalog = LevelCatalog::load(levels, grid, config.platform_slots)?;
        let level = catalog
            .compile_first()
            .map_err(|source| CatalogError::InvalidLevel { index: 0, source })?;
        let progress = LevelProgress::for_level(&level, config.max_blocks);
        debug!(
            levels = catalog.len(),
            grid = catalog.grid().len(),
            "session created"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            monitor: PositionMonitor::new(config.tolerance),
            config,
            catalog,
            level,
            progress,
            execution: ExecutionClock::default(),
            timers: EffectTimers::default(),
        })
    }

    fn require(&self, request: Request, allowed: &[GameState]) -> Result<(), RuleError> {
        let state = self.progress.state;
        if allowed.contains(&state) {
            Ok(())
        } else {
            Err(RuleError::InvalidTransition { state, request })
        }
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.progress.state;
        if from == to {
            return;
        }
        self.progress.state = to;
        debug!(%from, %to, level = self.level.index(), "state changed");
        out_events.push(Event::StateChanged { from, to });
    }

    fn enqueue_move(&mut self, action: Move, out_events: &mut Vec<Event>) -> Result<(), RuleError> {
        self.require(Request::EnqueueMove, &[GameState::Start])?;
        let slot = self.progress.queue.enqueue(action)?;
        out_events.push(Event::MoveQueued { slot, action });

        if self.config.execution == ExecutionMode::Immediate {
            self.transition(GameState::Running, out_events);
            self.execution.start(slot);
            self.dispatch_due(out_events);
        }
        Ok(())
    }

    fn undo_move(&mut self, out_events: &mut Vec<Event>) -> Result<(), RuleError> {
        self.require(Request::UndoMove, &[GameState::Start])?;
        if self.config.execution == ExecutionMode::Immediate {
            return Err(RuleError::InvalidTransition {
                state: self.progress.state,
                request: Request::UndoMove,
            });
        }
        let action = self.progress.queue.remove_last()?;
        out_events.push(Event::MoveUndone {
            slot: self.progress.queue.used(),
            action,
        });
        Ok(())
    }

    fn run(&mut self, out_events: &mut Vec<Event>) -> Result<(), RuleError> {
        self.require(Request::Run, &[GameState::Start])?;
        if self.config.execution == ExecutionMode::Immediate {
            return Err(RuleError::InvalidTransition {
                state: self.progress.state,
                request: Request::Run,
            });
        }
        if self.progress.queue.is_empty() {
            return Err(RuleError::EmptyQueue);
        }

        self.transition(GameState::Running, out_events);
        self.execution.start(0);
        self.dispatch_due(out_events);
        Ok(())
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for effect in self.timers.advance(dt) {
            match effect {
                DelayedEffect::SetTexture(texture) => {
                    out_events.push(Event::ButtonTextureChanged { texture });
                }
                DelayedEffect::HideCharacter => out_events.push(Event::CharacterHidden),
            }
        }

        if self.progress.state != GameState::Running {
            return;
        }

        self.execution.advance(dt);
        self.dispatch_due(out_events);

        let queued = self.progress.queue.used();
        if self
            .execution
            .is_exhausted(queued, self.config.step_interval())
        {
            self.execution.stop();
            self.finish_run(out_events);
        }
    }

    fn dispatch_due(&mut self, out_events: &mut Vec<Event>) {
        let interval = self.config.step_interval();
        while let Some(index) = self
            .execution
            .next_due(self.progress.queue.used(), interval)
        {
            let Some(&action) = self.progress.queue.as_ordered_commands().get(index) else {
                break;
            };
            self.dispatch(action, out_events);
        }
    }

    fn dispatch(&mut self, action: Move, out_events: &mut Vec<Event>) {
        let motion = movement::apply(self.progress.facing, action);
        let (dx, dz) = motion.translation(self.catalog.grid().increment());
        let from = self.progress.position;
        let to = from.offset(dx, dz);

        self.progress.facing = motion.facing;
        self.progress.position = to;
        self.progress.yaw_degrees += motion.rotation_degrees;
        trace!(%action, %from, %to, facing = %motion.facing, "dispatching move");

        out_events.push(Event::MotionStarted {
            action,
            from,
            to,
            facing: motion.facing,
            rotation_degrees: motion.rotation_degrees,
            duration: self.config.motion_duration(),
        });
    }

    fn finish_run(&mut self, out_events: &mut Vec<Event>) {
        let out_of_moves = match self.config.execution {
            ExecutionMode::Batch => true,
            ExecutionMode::Immediate => self.progress.queue.available() == 0,
        };

        if out_of_moves {
            self.transition(GameState::Uncomplete, out_events);
            out_events.push(Event::ButtonTextureChanged {
                texture: ButtonTexture::Retry,
            });
        } else {
            self.transition(GameState::Start, out_events);
        }
    }

    fn sample_position(&mut self, x: f64, z: f64, out_events: &mut Vec<Event>) {
        if self.progress.state != GameState::Running {
            return;
        }

        let goal = self.level.path().goal();
        let Some(arrival) = self
            .monitor
            .classify(x, z, goal, self.level.hazards().as_slice())
        else {
            return;
        };

        self.execution.stop();
        self.progress.position = arrival.cell();
        out_events.push(Event::CharacterSnapped {
            at: arrival.cell(),
        });
        self.clear_queue(out_events);

        match arrival {
            Arrival::Goal(_) => {
                out_events.push(Event::ObstacleHidden);
                self.transition(GameState::Complete, out_events);
                self.timers.schedule(
                    self.config.texture_delay(),
                    DelayedEffect::SetTexture(ButtonTexture::Next),
                );
            }
            Arrival::Hazard(_) => {
                self.transition(GameState::Failed, out_events);
                self.timers.schedule(
                    self.config.texture_delay(),
                    DelayedEffect::SetTexture(ButtonTexture::Retry),
                );
                self.timers
                    .schedule(self.config.hide_delay(), DelayedEffect::HideCharacter);
            }
        }
    }

    fn clear_queue(&mut self, out_events: &mut Vec<Event>) {
        if !self.progress.queue.is_empty() {
            self.progress.queue.clear();
            out_events.push(Event::QueueCleared);
        }
    }

    fn reset_level(&mut self, out_events: &mut Vec<Event>) -> Result<(), RuleError> {
        self.require(
            Request::ResetLevel,
            &[GameState::Start, GameState::Failed, GameState::Uncomplete],
        )?;
        self.reinitialize(out_events);
        Ok(())
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) -> Result<(), RuleError> {
        self.require(Request::AdvanceLevel, &[GameState::Complete])?;
        let next = self.catalog.compile_next(self.level.index())?;
        debug!(from = self.level.index(), to = next.index(), "advancing level");

        self.level = next;
        out_events.push(Event::PlatformsCleared {
            slots: self.catalog.platform_slots(),
        });
        self.reinitialize(out_events);
        Ok(())
    }

    fn reinitialize(&mut self, out_events: &mut Vec<Event>) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "cancelled pending effects");
        }
        self.execution.stop();
        self.clear_queue(out_events);

        let previous = self.progress.state;
        self.progress = LevelProgress::for_level(&self.level, self.config.max_blocks);
        if previous != GameState::Start {
            out_events.push(Event::StateChanged {
                from: previous,
                to: GameState::Start,
            });
        }

        out_events.push(Event::CharacterShown);
        out_events.push(Event::ObstacleShown);
        out_events.push(Event::ButtonTextureChanged {
            texture: ButtonTexture::Play,
        });
        announce_level(self, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::Tick { dt } => {
            world.tick(dt, out_events);
            Ok(())
        }
        Command::SamplePosition { x, z } => {
            world.sample_position(x, z, out_events);
            Ok(())
        }
        Command::EnqueueMove { action } => world
            .enqueue_move(action, out_events)
            .map_err(|reason| (Request::EnqueueMove, reason)),
        Command::UndoMove => world
            .undo_move(out_events)
            .map_err(|reason| (Request::UndoMove, reason)),
        Command::Run => world
            .run(out_events)
            .map_err(|reason| (Request::Run, reason)),
        Command::ResetLevel => world
            .reset_level(out_events)
            .map_err(|reason| (Request::ResetLevel, reason)),
        Command::AdvanceLevel => world
            .advance_level(out_events)
            .map_err(|reason| (Request::AdvanceLevel, reason)),
    };

    if let Err((request, reason)) = outcome {
        warn!(%request, %reason, state = %world.progress.state, "command rejected");
        out_events.push(Event::CommandRejected { request, reason });
    }
}

/// Emits the layout of the active level: character, goal obstacle and platforms.
///
/// Adapters call this once after creating the world; resets and level
/// changes announce the layout on their own.
pub fn announce_level(world: &World, out_events: &mut Vec<Event>) {
    let path = world.level.path();
    out_events.push(Event::LevelLoaded {
        level: world.level.index(),
        facing: world.level.facing(),
        start: path.start(),
        goal: path.goal(),
        yaw_degrees: world.level.facing().yaw_degrees(),
    });
    for (slot, &at) in path.as_slice().iter().enumerate() {
        out_events.push(Event::PlatformPlaced { slot, at });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_puzzle_core::{
        Coordinate, Facing, GameState, Move, ProgressSnapshot, SessionConfig,
    };
    use path_puzzle_system_level_compiler::{CompiledLevel, Grid};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(world: &World) -> GameState {
        world.progress.state
    }

    /// Current facing of the character.
    #[must_use]
    pub fn facing(world: &World) -> Facing {
        world.progress.facing
    }

    /// Logical position of the character.
    #[must_use]
    pub fn position(world: &World) -> Coordinate {
        world.progress.position
    }

    /// Zero-based index of the active level.
    #[must_use]
    pub fn level_index(world: &World) -> usize {
        world.level.index()
    }

    /// Number of levels in the session.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.catalog.len()
    }

    /// Compiled path and hazards of the active level.
    #[must_use]
    pub fn level(world: &World) -> &CompiledLevel {
        &world.level
    }

    /// Grid shared by every level.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        world.catalog.grid()
    }

    /// Queued movement commands in execution order.
    #[must_use]
    pub fn queued_moves(world: &World) -> &[Move] {
        world.progress.queue.as_ordered_commands()
    }

    /// Number of queued movement commands.
    #[must_use]
    pub fn blocks_used(world: &World) -> usize {
        world.progress.queue.used()
    }

    /// Reports whether delayed effects are still waiting to fire.
    #[must_use]
    pub fn has_pending_effects(world: &World) -> bool {
        !world.timers.is_idle()
    }

    /// Captures a read-only snapshot of the player's progress.
    #[must_use]
    pub fn progress(world: &World) -> ProgressSnapshot {
        ProgressSnapshot {
            level_index: world.level.index(),
            facing: world.progress.facing,
            state: world.progress.state,
            blocks_used: world.progress.queue.used(),
            blocks_available: world.progress.queue.available(),
            position: world.progress.position,
            yaw_degrees: world.progress.yaw_degrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_puzzle_core::{CellCoord, ConfigError};

    fn straight_level() -> LevelSpec {
        LevelSpec::new(
            Facing::East,
            vec![
                CellCoord::new(3, 0),
                CellCoord::new(3, 1),
                CellCoord::new(3, 2),
            ],
        )
    }

    fn world() -> World {
        World::new(SessionConfig::default(), vec![straight_level()]).expect("world")
    }

    #[test]
    fn new_world_starts_on_path_start() {
        let world = world();
        assert_eq!(query::state(&world), GameState::Start);
        assert_eq!(query::position(&world), Coordinate::rounded(0.0, -0.36));
        assert_eq!(query::facing(&world), Facing::East);
        assert_eq!(query::progress(&world).yaw_degrees, 0.0);
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = SessionConfig {
            max_blocks: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            World::new(config, vec![straight_level()]),
            Err(SetupError::Config(_))
        ));
    }

    #[test]
    fn step_interval_shorter_than_motion_is_reported() {
        let config = SessionConfig {
            step_interval_ms: 300,
            ..SessionConfig::default()
        };
        assert_eq!(
            World::new(config, vec![straight_level()]).err(),
            Some(SetupError::Config(ConfigError::StepShorterThanMotion {
                step_interval_ms: 300,
                motion_duration_ms: 400,
            }))
        );
    }

    #[test]
    fn announce_level_places_every_platform() {
        let world = world();
        let mut events = Vec::new();
        announce_level(&world, &mut events);

        let platforms = events
            .iter()
            .filter(|event| matches!(event, Event::PlatformPlaced { .. }))
            .count();
        assert_eq!(platforms, 3);
        assert!(matches!(
            events.first(),
            Some(Event::LevelLoaded { level: 0, .. })
        ));
    }

    #[test]
    fn sample_outside_running_is_ignored() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SamplePosition { x: 0.0, z: -0.12 },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::state(&world), GameState::Start);
    }
}
