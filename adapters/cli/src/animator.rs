//! Headless stand-in for the 3D animation layer.
//!
//! Motions are interpolated linearly over their duration, and the animated
//! position is reported back every frame the way a renderer would sample its
//! character model.

use std::time::Duration;

use path_puzzle_core::{Coordinate, Event};

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: Coordinate,
    to: Coordinate,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    fn position(&self) -> (f64, f64) {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        (
            self.from.x() + (self.to.x() - self.from.x()) * progress,
            self.from.z() + (self.to.z() - self.from.z()) * progress,
        )
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Animated character position driven by world events.
#[derive(Clone, Debug)]
pub(crate) struct Animator {
    tween: Option<Tween>,
    visible: bool,
}

impl Animator {
    /// Creates an animator showing the character.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            tween: None,
            visible: true,
        }
    }

    /// Starts, snaps or hides the animation according to world events.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::MotionStarted {
                    from, to, duration, ..
                } => {
                    self.tween = Some(Tween {
                        from: *from,
                        to: *to,
                        duration: *duration,
                        elapsed: Duration::ZERO,
                    });
                }
                Event::CharacterSnapped { .. } | Event::LevelLoaded { .. } => self.tween = None,
                Event::CharacterHidden => self.visible = false,
                Event::CharacterShown => self.visible = true,
                _ => {}
            }
        }
    }

    /// Advances the active motion and returns the sampled position.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<(f64, f64)> {
        let tween = self.tween.as_mut()?;
        tween.elapsed = tween.elapsed.saturating_add(dt);
        let sample = tween.position();
        if tween.is_finished() {
            self.tween = None;
        }
        Some(sample)
    }

    /// Reports whether no motion is in flight.
    #[must_use]
    pub(crate) fn is_idle(&self) -> bool {
        self.tween.is_none()
    }

    /// Reports whether the character is currently drawn.
    #[must_use]
    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_puzzle_core::{Facing, Move};

    fn motion(duration: Duration) -> Event {
        Event::MotionStarted {
            action: Move::Forward,
            from: Coordinate::rounded(0.0, 0.0),
            to: Coordinate::rounded(0.0, 0.5),
            facing: Facing::East,
            rotation_degrees: 0.0,
            duration,
        }
    }

    #[test]
    fn motion_interpolates_to_target() {
        let mut animator = Animator::new();
        animator.observe(&[motion(Duration::from_millis(400))]);

        assert_eq!(animator.advance(Duration::from_millis(200)), Some((0.0, 0.25)));
        assert_eq!(animator.advance(Duration::from_millis(300)), Some((0.0, 0.5)));
        assert!(animator.is_idle());
        assert_eq!(animator.advance(Duration::from_millis(16)), None);
    }

    #[test]
    fn snapping_stops_motion() {
        let mut animator = Animator::new();
        animator.observe(&[
            motion(Duration::from_millis(400)),
            Event::CharacterSnapped {
                at: Coordinate::rounded(0.0, 0.5),
            },
        ]);
        assert!(animator.is_idle());
    }

    #[test]
    fn visibility_follows_events() {
        let mut animator = Animator::new();
        animator.observe(&[Event::CharacterHidden]);
        assert!(!animator.is_visible());
        animator.observe(&[Event::CharacterShown]);
        assert!(animator.is_visible());
    }
}
