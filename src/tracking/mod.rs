//! Transaction tracking subsystem.
//!
//! # Data Flow
//! ```text
//! pipeline flows
//!     → TransactionTracker::publish (non-blocking, unacknowledged)
//!     → unbounded mpsc channel
//!     → recent.rs (RecentTransactions: in-memory map + JSON file)
//! ```
//!
//! # Design Decisions
//! - Publishing never waits and never fails; a closed channel drops events
//! - Flows work unchanged with a disabled tracker

pub mod recent;
pub mod types;

use tokio::sync::mpsc;

pub use recent::RecentTransactions;
pub use types::{RecentTransaction, TrackedTransaction, TrackerEvent, TransactionStatus};

/// Sending half of the tracking channel.
#[derive(Debug, Clone, Default)]
pub struct TransactionTracker {
    tx: Option<mpsc::UnboundedSender<TrackerEvent>>,
}

impl TransactionTracker {
    /// Create a tracker and the receiver its events arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TrackerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A tracker that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emit `event` without waiting for anyone to receive it.
    pub fn publish(&self, event: TrackerEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                tracing::debug!("Transaction tracker receiver gone, event dropped");
            }
        }
    }
}
