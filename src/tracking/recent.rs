//! Recent transaction history and persistence.

use alloy::primitives::TxHash;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

use crate::tracking::types::{RecentTransaction, TrackerEvent, TransactionStatus};

/// A thread-safe store of recently submitted transactions.
#[derive(Clone)]
pub struct RecentTransactions {
    inner: Arc<DashMap<TxHash, (u64, RecentTransaction)>>,
    /// Insertion counter; orders entries recorded within the same second.
    sequence: Arc<AtomicU64>,
    max_entries: usize,
    persistence_path: Option<String>,
}

impl RecentTransactions {
    /// Create a new empty store.
    pub fn new(max_entries: usize, persistence_path: Option<String>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicU64::new(0)),
            max_entries: max_entries.max(1),
            persistence_path,
        }
    }

    /// Load from file if it exists.
    pub fn load_from_file(path: &str, max_entries: usize) -> std::io::Result<Self> {
        let store = Self::new(max_entries, Some(path.to_string()));
        if Path::new(path).exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let mut entries: Vec<RecentTransaction> = serde_json::from_reader(reader)?;

            // The file is stored newest first.
            entries.reverse();
            for entry in entries {
                store.insert(entry);
            }
            tracing::info!(count = store.count(), "Loaded recent transactions");
        }
        Ok(store)
    }

    /// Save to file, newest first.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            let entries = self.list();
            serde_json::to_writer_pretty(writer, &entries)?;
            tracing::debug!(count = entries.len(), path = %path, "Saved recent transactions");
        }
        Ok(())
    }

    /// Apply one tracker event.
    pub fn apply(&self, event: TrackerEvent) {
        match event {
            TrackerEvent::Submitted(tx) => self.insert(RecentTransaction {
                hash: tx.hash,
                description: tx.description,
                status: TransactionStatus::Pending,
                submitted_at: now_secs(),
            }),
            TrackerEvent::Confirmed { hash } => self.set_status(hash, TransactionStatus::Confirmed),
            TrackerEvent::Failed { hash, reason } => {
                self.set_status(hash, TransactionStatus::Failed { reason })
            }
        }
    }

    /// Consume tracker events until every sender is dropped.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<TrackerEvent>) {
        while let Some(event) = events.recv().await {
            self.apply(event);
        }
        if let Err(e) = self.save_to_file() {
            tracing::error!(error = %e, "Failed to persist recent transactions");
        }
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<RecentTransaction> {
        let mut entries: Vec<(u64, RecentTransaction)> =
            self.inner.iter().map(|r| r.value().clone()).collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Look up a single entry.
    pub fn get(&self, hash: &TxHash) -> Option<RecentTransaction> {
        self.inner.get(hash).map(|r| r.value().1.clone())
    }

    pub fn count(&self) -> usize {
        self.inner.len()
    }

    fn insert(&self, entry: RecentTransaction) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(entry.hash, (seq, entry));

        while self.inner.len() > self.max_entries {
            let oldest = self
                .inner
                .iter()
                .min_by_key(|r| r.value().0)
                .map(|r| *r.key());
            match oldest {
                Some(hash) => {
                    self.inner.remove(&hash);
                }
                None => break,
            }
        }
    }

    fn set_status(&self, hash: TxHash, status: TransactionStatus) {
        match self.inner.get_mut(&hash) {
            Some(mut entry) => entry.value_mut().1.status = status,
            None => tracing::debug!(tx_hash = %hash, "Status update for untracked transaction"),
        }
    }
}

impl std::fmt::Debug for RecentTransactions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentTransactions")
            .field("count", &self.count())
            .field("max_entries", &self.max_entries)
            .field("persistence_path", &self.persistence_path)
            .finish()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Group entries by status label, for summaries.
pub fn status_counts(entries: &[RecentTransaction]) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for entry in entries {
        let label = match entry.status {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Failed { .. } => "failed",
        };
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::types::TrackedTransaction;
    use crate::tracking::TransactionTracker;

    fn submitted(byte: u8, description: &str) -> TrackerEvent {
        TrackerEvent::Submitted(TrackedTransaction {
            hash: TxHash::repeat_byte(byte),
            description: description.to_string(),
        })
    }

    #[test]
    fn test_status_transitions() {
        let store = RecentTransactions::new(10, None);
        let hash = TxHash::repeat_byte(1);

        store.apply(submitted(1, "Create collection a"));
        assert_eq!(store.get(&hash).unwrap().status, TransactionStatus::Pending);

        store.apply(TrackerEvent::Confirmed { hash });
        assert_eq!(store.get(&hash).unwrap().status, TransactionStatus::Confirmed);

        // Unknown hashes are ignored
        store.apply(TrackerEvent::Confirmed {
            hash: TxHash::repeat_byte(9),
        });
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_list_is_newest_first_and_capped() {
        let store = RecentTransactions::new(2, None);
        store.apply(submitted(1, "first"));
        store.apply(submitted(2, "second"));
        store.apply(submitted(3, "third"));

        let descriptions: Vec<_> = store.list().into_iter().map(|e| e.description).collect();
        assert_eq!(descriptions, vec!["third", "second"]);
    }

    #[test]
    fn test_status_counts() {
        let store = RecentTransactions::new(10, None);
        store.apply(submitted(1, "a"));
        store.apply(submitted(2, "b"));
        store.apply(TrackerEvent::Failed {
            hash: TxHash::repeat_byte(2),
            reason: "reverted".into(),
        });

        let counts = status_counts(&store.list());
        assert_eq!(counts.get("pending"), Some(&1));
        assert_eq!(counts.get("failed"), Some(&1));
    }

    #[test]
    fn test_persistence() {
        let path = std::env::temp_dir()
            .join(format!("recent-{}.json", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();

        let store = RecentTransactions::new(10, Some(path.clone()));
        store.apply(submitted(1, "older"));
        store.apply(submitted(2, "newer"));
        store.save_to_file().unwrap();

        let loaded = RecentTransactions::load_from_file(&path, 10).unwrap();
        let descriptions: Vec<_> = loaded.list().into_iter().map(|e| e.description).collect();
        assert_eq!(descriptions, vec!["newer", "older"]);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_run_consumes_until_senders_drop() {
        let store = RecentTransactions::new(10, None);
        let (tracker, rx) = TransactionTracker::channel();
        let task = tokio::spawn(store.clone().run(rx));

        tracker.publish(submitted(5, "Mint single nft"));
        drop(tracker);
        task.await.unwrap();

        assert_eq!(store.count(), 1);
    }
}
