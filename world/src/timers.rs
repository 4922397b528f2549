//! Fire-once delayed presentation effects driven by the session clock.

use std::time::Duration;

use path_puzzle_core::ButtonTexture;

/// Presentation effect that fires after a fixed delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DelayedEffect {
    /// Swap the context button texture.
    SetTexture(ButtonTexture),
    /// Hide the character after a fall.
    HideCharacter,
}

#[derive(Clone, Copy, Debug)]
struct PendingEffect {
    due: Duration,
    sequence: u64,
    effect: DelayedEffect,
}

/// Pending delayed effects ordered by due time, then scheduling order.
#[derive(Debug, Default)]
pub(crate) struct EffectTimers {
    now: Duration,
    next_sequence: u64,
    pending: Vec<PendingEffect>,
}

impl EffectTimers {
    /// Schedules an effect to fire once `delay` has elapsed.
    pub(crate) fn schedule(&mut self, delay: Duration, effect: DelayedEffect) {
        self.pending.push(PendingEffect {
            due: self.now.saturating_add(delay),
            sequence: self.next_sequence,
            effect,
        });
        self.next_sequence = self.next_sequence.wrapping_add(1);
    }

    /// Advances the clock and returns every effect that became due.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<DelayedEffect> {
        self.now = self.now.saturating_add(dt);
        if self.pending.is_empty() {
            return Vec::new();
        }

        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|entry| entry.due <= now);
        self.pending = pending;
        due.sort_by_key(|entry| (entry.due, entry.sequence));
        due.into_iter().map(|entry| entry.effect).collect()
    }

    /// Drops every pending effect so stale callbacks cannot touch a fresh level.
    pub(crate) fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    /// Reports whether no effects are waiting to fire.
    pub(crate) fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
