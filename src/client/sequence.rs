use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

/// Tag handed out for each request issued on a [`RequestSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Holds the result of the most recently issued request of one kind.
///
/// Every request takes a ticket before it starts; when it finishes, its
/// result is only stored if no newer ticket has been issued in the meantime.
/// A slow, superseded request can therefore never overwrite a newer result.
pub struct RequestSlot<T> {
    issued: AtomicU64,
    current: RwLock<Option<(Ticket, T)>>,
}

impl<T: Clone> RequestSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` if `ticket` is still the latest. Returns whether it was
    /// applied.
    pub async fn resolve(&self, ticket: Ticket, value: T) -> bool {
        let mut current = self.current.write().await;
        if !self.is_latest(ticket) {
            return false;
        }
        *current = Some((ticket, value));
        true
    }

    pub async fn current(&self) -> Option<T> {
        let current = self.current.read().await;
        current.as_ref().map(|(_, value)| value.clone())
    }

    pub async fn clear(&self) {
        self.issue();
        let mut current = self.current.write().await;
        *current = None;
    }
}

impl<T: Clone> Default for RequestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
