//! Bounded queue of movement commands owned by the world.

use path_puzzle_core::{Move, RuleError};

/// Ordered list of queued movement commands with a fixed capacity.
///
/// The number of queued commands doubles as the "blocks used" counter shown
/// by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandQueue {
    entries: Vec<Move>,
    capacity: usize,
}

impl CommandQueue {
    /// Creates an empty queue accepting at most `capacity` commands.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a command and returns the slot it occupies.
    ///
    /// A full queue rejects the command and keeps its length unchanged.
    pub fn enqueue(&mut self, action: Move) -> Result<usize, RuleError> {
        if self.entries.len() >= self.capacity {
            return Err(RuleError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.entries.push(action);
        Ok(self.entries.len() - 1)
    }

    /// Removes and returns the most recently queued command.
    pub fn remove_last(&mut self) -> Result<Move, RuleError> {
        self.entries.pop().ok_or(RuleError::EmptyQueue)
    }

    /// Discards every queued command.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Queued commands in execution order.
    #[must_use]
    pub fn as_ordered_commands(&self) -> &[Move] {
        &self.entries
    }

    /// Number of queued commands.
    #[must_use]
    pub fn used(&self) -> usize {
        self.entries.len()
    }

    /// Number of commands that can still be queued.
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.entries.len())
    }

    /// Maximum number of commands the queue accepts.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reports whether no commands are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_reports_slots_in_order() {
        let mut queue = CommandQueue::with_capacity(3);
        assert_eq!(queue.enqueue(Move::Forward), Ok(0));
        assert_eq!(queue.enqueue(Move::TurnLeft), Ok(1));
        assert_eq!(queue.used(), 2);
        assert_eq!(queue.available(), 1);
    }

    #[test]
    fn full_queue_rejects_without_growing() {
        let mut queue = CommandQueue::with_capacity(2);
        let _ = queue.enqueue(Move::Forward).expect("first");
        let _ = queue.enqueue(Move::Forward).expect("second");

        assert_eq!(
            queue.enqueue(Move::TurnRight),
            Err(RuleError::QueueFull { capacity: 2 })
        );
        assert_eq!(queue.used(), 2);
        assert_eq!(queue.as_ordered_commands(), &[Move::Forward, Move::Forward]);
    }

    #[test]
    fn remove_last_pops_most_recent_command() {
        let mut queue = CommandQueue::with_capacity(4);
        let _ = queue.enqueue(Move::Forward).expect("first");
        let _ = queue.enqueue(Move::TurnRight).expect("second");

        assert_eq!(queue.remove_last(), Ok(Move::TurnRight));
        assert_eq!(queue.as_ordered_commands(), &[Move::Forward]);
    }

    #[test]
    fn remove_last_on_empty_queue_fails() {
        let mut queue = CommandQueue::with_capacity(1);
        assert_eq!(queue.remove_last(), Err(RuleError::EmptyQueue));
    }

    #[test]
    fn clear_restores_full_capacity() {
        let mut queue = CommandQueue::with_capacity(2);
        let _ = queue.enqueue(Move::Forward).expect("first");
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.available(), queue.capacity());
    }
}
