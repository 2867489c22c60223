//! Live connection accounting.
//!
//! Advisory only: nothing gates admission on this count.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared count of connections currently being served.
#[derive(Debug, Clone, Default)]
pub struct ConnectionCounter {
    live: Arc<AtomicUsize>,
}

impl ConnectionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new connection. The count drops again when the guard does.
    pub fn track(&self) -> ConnectionGuard {
        self.live.fetch_add(1, Ordering::Relaxed);
        ConnectionGuard {
            live: Arc::clone(&self.live),
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct ConnectionGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}
