use std::sync::atomic::{AtomicU64, Ordering};

pub type ReservationId = u64;

/// First id handed out by a fresh [`ReservationIdSequence`].
pub const FIRST_RESERVATION_ID: ReservationId = 1000;

/// Monotonic source of reservation ids.
///
/// Each flight network owns (or shares, via `Arc`) its own sequence, so
/// independent networks never leak ids into each other.
#[derive(Debug)]
pub struct ReservationIdSequence {
    next: AtomicU64,
}

impl Default for ReservationIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationIdSequence {
    pub fn new() -> Self {
        Self::starting_at(FIRST_RESERVATION_ID)
    }

    pub fn starting_at(first: ReservationId) -> Self {
        Self { next: AtomicU64::new(first) }
    }

    pub fn next_id(&self) -> ReservationId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> ReservationId {
        self.next.load(Ordering::SeqCst)
    }
}
