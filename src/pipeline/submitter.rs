//! Transaction submission seam.
//!
//! Submission has two suspension points: broadcast (yielding a pending
//! handle) and confirmation. Implementors provide them as `send` and
//! `confirm`; `submit` chains the two. The tracked variants tell the tracker
//! about the pending hash in between, without waiting on it.

use async_trait::async_trait;

use crate::observability::metrics;
use crate::pipeline::types::{MintResult, PendingTransaction, TransactionReceipt, TransactionRequest};
use crate::tracking::{TrackedTransaction, TrackerEvent, TransactionTracker};

/// Sends contract calls and waits for their receipts.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Sign and broadcast `request`.
    ///
    /// Fails with `SubmissionRejected` if the network or signer refuses it.
    async fn send(&self, request: &TransactionRequest) -> MintResult<PendingTransaction>;

    /// Wait until `pending` is included with the configured depth.
    ///
    /// Fails with `ConfirmationTimeout` when the wait policy runs out and with
    /// `SubmissionRejected` when the transaction reverted.
    async fn confirm(&self, pending: &PendingTransaction) -> MintResult<TransactionReceipt>;

    /// Broadcast `request` and wait for its receipt.
    async fn submit(&self, request: &TransactionRequest) -> MintResult<TransactionReceipt> {
        let pending = self.send(request).await?;
        self.confirm(&pending).await
    }
}

/// Broadcast `request` and publish the pending hash to `tracker`.
pub async fn send_tracked(
    submitter: &dyn TransactionSubmitter,
    tracker: &TransactionTracker,
    request: &TransactionRequest,
) -> MintResult<PendingTransaction> {
    let result = submitter.send(request).await;
    metrics::record_transaction("send", result.is_ok());

    let pending = result?;
    tracing::info!(
        tx_hash = %pending.hash,
        description = %pending.description,
        "Transaction submitted"
    );
    tracker.publish(TrackerEvent::Submitted(TrackedTransaction {
        hash: pending.hash,
        description: pending.description.clone(),
    }));
    Ok(pending)
}

/// Await confirmation of `pending` and publish the outcome to `tracker`.
pub async fn confirm_tracked(
    submitter: &dyn TransactionSubmitter,
    tracker: &TransactionTracker,
    pending: &PendingTransaction,
) -> MintResult<TransactionReceipt> {
    let result = submitter.confirm(pending).await;
    metrics::record_transaction("confirm", result.is_ok());

    match &result {
        Ok(receipt) => {
            tracing::info!(
                tx_hash = %pending.hash,
                block_number = ?receipt.block_number,
                events = receipt.event_log.len(),
                "Transaction confirmed"
            );
            tracker.publish(TrackerEvent::Confirmed { hash: pending.hash });
        }
        Err(e) => {
            tracing::warn!(tx_hash = %pending.hash, error = %e, "Transaction failed");
            tracker.publish(TrackerEvent::Failed {
                hash: pending.hash,
                reason: e.to_string(),
            });
        }
    }
    result
}

/// [`TransactionSubmitter::submit`] with tracker notifications.
pub async fn submit_tracked(
    submitter: &dyn TransactionSubmitter,
    tracker: &TransactionTracker,
    request: &TransactionRequest,
) -> MintResult<TransactionReceipt> {
    let pending = send_tracked(submitter, tracker, request).await?;
    confirm_tracked(submitter, tracker, &pending).await
}
