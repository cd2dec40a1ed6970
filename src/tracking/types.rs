//! Tracking events and history entries.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

/// A submitted transaction as reported to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTransaction {
    pub hash: TxHash,
    pub description: String,
}

/// Notifications emitted by the flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Broadcast succeeded; confirmation not yet known.
    Submitted(TrackedTransaction),
    Confirmed { hash: TxHash },
    Failed { hash: TxHash, reason: String },
}

/// Last known state of a tracked transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed { reason: String },
}

/// One entry of the recent transactions history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentTransaction {
    pub hash: TxHash,
    pub description: String,
    pub status: TransactionStatus,
    /// Seconds since epoch when the submission was recorded.
    pub submitted_at: u64,
}
