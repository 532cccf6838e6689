// SPDX-License-Identifier: MPL-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter of views opened on one surface. Opening a view retires every
/// ticket handed out before it.
#[derive(Debug, Clone, Default)]
pub struct ViewEpoch {
    current: Arc<AtomicU64>,
}

/// Proof that a response belongs to a particular view.
#[derive(Debug, Clone)]
pub struct ViewTicket {
    current: Arc<AtomicU64>,
    id: u64,
}

impl ViewEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> ViewTicket {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        ViewTicket {
            current: Arc::clone(&self.current),
            id,
        }
    }
}

impl ViewTicket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }

    /// `Some(value)` only while this view is still the live one.
    pub fn admit<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            tracing::debug!(view = self.id, "dropping response for a stale view");
            None
        }
    }
}
