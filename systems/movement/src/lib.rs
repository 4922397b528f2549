#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement rules shared by the state machine and the animation layer.
//!
//! [`apply`] is the single source of truth for how a movement command changes
//! the character's facing and position, so facing bookkeeping and the
//! animated transform never disagree about orientation.

use path_puzzle_core::{Facing, Move};

/// Quarter turn expressed in degrees.
pub const QUARTER_TURN_DEGREES: f64 = 90.0;

/// Outcome of applying a single movement command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Facing after the command.
    pub facing: Facing,
    /// Grid steps travelled along the x axis (-1, 0 or 1).
    pub step_x: i32,
    /// Grid steps travelled along the z axis (-1, 0 or 1).
    pub step_z: i32,
    /// Yaw change in degrees; positive values turn counter-clockwise.
    pub rotation_degrees: f64,
}

impl Motion {
    /// Converts the grid steps into a world-space translation.
    #[must_use]
    pub fn translation(&self, increment: f64) -> (f64, f64) {
        (
            f64::from(self.step_x) * increment,
            f64::from(self.step_z) * increment,
        )
    }

    /// Reports whether the command moves the character to another cell.
    #[must_use]
    pub const fn is_translation(&self) -> bool {
        self.step_x != 0 || self.step_z != 0
    }
}

/// Maps the current facing and a movement command to the resulting motion.
#[must_use]
pub fn apply(facing: Facing, action: Move) -> Motion {
    match action {
        Move::Forward => {
            let (step_x, step_z) = forward_steps(facing);
            Motion {
                facing,
                step_x,
                step_z,
                rotation_degrees: 0.0,
            }
        }
        Move::TurnLeft => Motion {
            facing: left_of(facing),
            step_x: 0,
            step_z: 0,
            rotation_degrees: QUARTER_TURN_DEGREES,
        },
        Move::TurnRight => Motion {
            facing: right_of(facing),
            step_x: 0,
            step_z: 0,
            rotation_degrees: -QUARTER_TURN_DEGREES,
        },
    }
}

/// Folds a sequence of commands into the final facing and every motion produced.
#[must_use]
pub fn replay(facing: Facing, actions: &[Move]) -> (Facing, Vec<Motion>) {
    let mut current = facing;
    let mut motions = Vec::with_capacity(actions.len());
    for &action in actions {
        let motion = apply(current, action);
        current = motion.facing;
        motions.push(motion);
    }
    (current, motions)
}

fn forward_steps(facing: Facing) -> (i32, i32) {
    match facing {
        Facing::North => (1, 0),
        Facing::South => (-1, 0),
        Facing::East => (0, 1),
        Facing::West => (0, -1),
    }
}

// east -> north -> west -> south -> east
fn left_of(facing: Facing) -> Facing {
    match facing {
        Facing::East => Facing::North,
        Facing::North => Facing::West,
        Facing::West => Facing::South,
        Facing::South => Facing::East,
    }
}

fn right_of(facing: Facing) -> Facing {
    match facing {
        Facing::East => Facing::South,
        Facing::South => Facing::West,
        Facing::West => Facing::North,
        Facing::North => Facing::East,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_keeps_facing() {
        for facing in Facing::ALL {
            let motion = apply(facing, Move::Forward);
            assert_eq!(motion.facing, facing);
            assert!(motion.is_translation());
            assert_eq!(motion.rotation_degrees, 0.0);
        }
    }

    #[test]
    fn turns_do_not_translate() {
        let left = apply(Facing::South, Move::TurnLeft);
        let right = apply(Facing::South, Move::TurnRight);
        assert!(!left.is_translation());
        assert!(!right.is_translation());
        assert_eq!(left.rotation_degrees, 90.0);
        assert_eq!(right.rotation_degrees, -90.0);
    }

    #[test]
    fn translation_scales_with_increment() {
        let motion = apply(Facing::West, Move::Forward);
        assert_eq!(motion.translation(0.12), (0.0, -0.12));
    }
}
