//! Request identifier sources.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU16, Ordering};

use uuid::Uuid;

/// Supplies the identifier for each new command.
///
/// Only one command is in flight per connection, so identifiers only need to
/// differ from whatever stale frame a transport could hand back.
pub trait IdGenerator: Debug + Send + Sync {
    fn next_id(&self) -> u16;
}

/// Identifiers taken from the low 16 bits of a random v4 UUID.
///
/// Bulbs reject identifiers wider than 16 bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> u16 {
        (Uuid::new_v4().as_u128() & 0xFFFF) as u16
    }
}

/// A wrapping 16-bit counter.
///
/// # Examples
///
/// ```
/// use yeelight_rs::{IdGenerator, SequentialIds};
///
/// let ids = SequentialIds::starting_at(u16::MAX);
/// assert_eq!(ids.next_id(), u16::MAX);
/// assert_eq!(ids.next_id(), 0);
/// ```
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU16,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u16) -> Self {
        SequentialIds {
            next: AtomicU16::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u16 {
        // fetch_add wraps on overflow
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_increment() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }

    #[test]
    fn test_random_ids_vary() {
        let ids = RandomIds;
        let first = ids.next_id();
        // 64 draws all equal to the first would mean the source is broken
        assert!((0..64).any(|_| ids.next_id() != first));
    }
}
