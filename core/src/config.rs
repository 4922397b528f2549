//! Session-wide tuning shared by the world and adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, COORDINATE_SCALE};

/// Slack allowed when checking that the half extent is a whole number of steps.
const ALIGNMENT_EPSILON: f64 = 1e-9;

/// Largest number of cells along one grid axis.
pub const MAX_AXIS_LEN: usize = 1_025;

/// Describes when queued movement commands are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Moves are collected in `start` and replayed in order once a run is requested.
    #[default]
    Batch,
    /// Every accepted move executes as soon as it is queued; the queue only records history.
    Immediate,
}

/// Tunable constants for a single play session.
///
/// Every field has a default, so configuration files only list overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Distance from the grid centre to the outermost cells along each axis.
    pub half_extent: f64,
    /// Spacing between neighbouring grid cells in world units.
    pub increment: f64,
    /// Symmetric collision window applied to position samples.
    pub tolerance: f64,
    /// Maximum number of movement commands the queue accepts.
    pub max_blocks: usize,
    /// Number of platform objects available to draw a level path.
    pub platform_slots: usize,
    /// Strategy used to execute queued commands.
    pub execution: ExecutionMode,
    /// Delay between two consecutive command dispatches, in milliseconds.
    pub step_interval_ms: u64,
    /// Duration of one movement animation, in milliseconds.
    pub motion_duration_ms: u64,
    /// Delay before the context button swaps its texture after a verdict.
    pub texture_delay_ms: u64,
    /// Delay before a fallen character is hidden.
    pub hide_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            half_extent: 0.36,
            increment: 0.12,
            tolerance: 0.005,
            max_blocks: 10,
            platform_slots: 10,
            execution: ExecutionMode::Batch,
            step_interval_ms: 1_000,
            motion_duration_ms: 400,
            texture_delay_ms: 500,
            hide_delay_ms: 200,
        }
    }
}

impl SessionConfig {
    /// Checks the grid and queue preconditions the rules engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.increment.is_nan() || self.increment <= 0.0 {
            return Err(ConfigError::NonPositiveIncrement(self.increment));
        }
        let ticks = self.increment * COORDINATE_SCALE;
        if ticks.round() < 1.0 || (ticks - ticks.round()).abs() > ALIGNMENT_EPSILON * ticks {
            return Err(ConfigError::SubPrecisionIncrement(self.increment));
        }
        if self.half_extent.is_nan() || self.half_extent < 0.0 {
            return Err(ConfigError::NegativeExtent(self.half_extent));
        }
        let steps = self.half_extent / self.increment;
        if (steps - steps.round()).abs() > ALIGNMENT_EPSILON {
            return Err(ConfigError::MisalignedExtent {
                half_extent: self.half_extent,
                increment: self.increment,
            });
        }
        // 2 * steps + 1 cells per axis; compared as f64 so huge ratios cannot overflow.
        if 2.0 * steps.round() + 1.0 > MAX_AXIS_LEN as f64 {
            return Err(ConfigError::GridTooLarge {
                half_extent: self.half_extent,
                increment: self.increment,
                max_axis_len: MAX_AXIS_LEN,
            });
        }
        if self.max_blocks == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ConfigError::NegativeTolerance(self.tolerance));
        }
        if self.step_interval_ms == 0 || self.step_interval_ms < self.motion_duration_ms {
            return Err(ConfigError::StepShorterThanMotion {
                step_interval_ms: self.step_interval_ms,
                motion_duration_ms: self.motion_duration_ms,
            });
        }
        Ok(())
    }

    /// Delay between two consecutive command dispatches.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// Duration announced for each movement animation.
    #[must_use]
    pub const fn motion_duration(&self) -> Duration {
        Duration::from_millis(self.motion_duration_ms)
    }

    /// Delay applied before the context button texture changes.
    #[must_use]
    pub const fn texture_delay(&self) -> Duration {
        Duration::from_millis(self.texture_delay_ms)
    }

    /// Delay applied before a fallen character disappears.
    #[must_use]
    pub const fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}
