use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter.
///
/// Each fetch takes a [`Ticket`] when it starts; a response is applied only
/// if its ticket is still the latest one issued.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
