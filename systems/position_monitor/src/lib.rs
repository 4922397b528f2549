#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision and goal detection for pushed position samples.

use path_puzzle_core::Coordinate;

/// Collision window used when no other tolerance is configured.
pub const DEFAULT_TOLERANCE: f64 = 0.005;

/// Verdict produced when a sample lands on a relevant cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arrival {
    /// The sample lies on the goal cell.
    Goal(Coordinate),
    /// The sample lies on the contained hazard cell.
    Hazard(Coordinate),
}

impl Arrival {
    /// Cell that produced the verdict.
    #[must_use]
    pub const fn cell(&self) -> Coordinate {
        match self {
            Self::Goal(cell) | Self::Hazard(cell) => *cell,
        }
    }
}

/// Tests position samples against the goal and hazard cells of a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionMonitor {
    tolerance: f64,
}

impl Default for PositionMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl PositionMonitor {
    /// Creates a monitor with the provided symmetric tolerance.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Tolerance applied on each axis.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Classifies a sample, checking the goal before any hazard.
    ///
    /// At most one verdict is produced: the goal wins over hazards, and the
    /// first matching hazard in iteration order wins over later ones.
    #[must_use]
    pub fn classify(
        &self,
        x: f64,
        z: f64,
        goal: Coordinate,
        hazards: &[Coordinate],
    ) -> Option<Arrival> {
        if self.covers(x, z, goal) {
            return Some(Arrival::Goal(goal));
        }

        hazards
            .iter()
            .copied()
            .find(|&hazard| self.covers(x, z, hazard))
            .map(Arrival::Hazard)
    }

    /// Reports whether the sample lies within the tolerance window of a cell.
    #[must_use]
    pub fn covers(&self, x: f64, z: f64, cell: Coordinate) -> bool {
        is_between(x, cell.x() + self.tolerance, cell.x() - self.tolerance)
            && is_between(z, cell.z() + self.tolerance, cell.z() - self.tolerance)
    }
}

/// Inclusive interval test that does not care about bound order.
#[must_use]
pub fn is_between(value: f64, a: f64, b: f64) -> bool {
    (value - a) * (value - b) <= 0.0
}
