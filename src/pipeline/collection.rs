//! Collection deployment through the factory.

use alloy::primitives::Address;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::pipeline::extract::extract_collection_address;
use crate::pipeline::state::{CollectionStage, Failure};
use crate::pipeline::submitter::{confirm_tracked, send_tracked, TransactionSubmitter};
use crate::pipeline::types::{
    CollectionParams, ContractCall, MintResult, PendingTransaction, TransactionReceipt,
    TransactionRequest,
};
use crate::tracking::TransactionTracker;

/// Deploys collections via `createCollection` and reports their address.
#[derive(Clone)]
pub struct CollectionCreationFlow {
    submitter: Arc<dyn TransactionSubmitter>,
    tracker: TransactionTracker,
    factory: Address,
}

impl CollectionCreationFlow {
    pub fn new(
        submitter: Arc<dyn TransactionSubmitter>,
        tracker: TransactionTracker,
        factory: Address,
    ) -> Self {
        Self {
            submitter,
            tracker,
            factory,
        }
    }

    /// Start a fresh attempt with its own progress channel.
    pub fn attempt(&self) -> CollectionAttempt<'_> {
        let (stage, _) = watch::channel(CollectionStage::Idle);
        CollectionAttempt {
            flow: self,
            id: Uuid::new_v4(),
            stage,
        }
    }

    /// Deploy a collection and return its address.
    pub async fn create(&self, params: CollectionParams) -> MintResult<String> {
        self.attempt().run(params).await
    }
}

/// One invocation of [`CollectionCreationFlow`].
pub struct CollectionAttempt<'a> {
    flow: &'a CollectionCreationFlow,
    id: Uuid,
    stage: watch::Sender<CollectionStage>,
}

impl CollectionAttempt<'_> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Subscribe to stage changes.
    pub fn progress(&self) -> watch::Receiver<CollectionStage> {
        self.stage.subscribe()
    }

    pub fn stage(&self) -> CollectionStage {
        self.stage.borrow().clone()
    }

    /// Run the attempt to completion.
    ///
    /// A failed attempt is final; retrying means starting a new attempt,
    /// which sends a new transaction.
    pub async fn run(self, params: CollectionParams) -> MintResult<String> {
        let span = tracing::info_span!("create_collection", attempt_id = %self.id);
        async {
            let result = self.execute(params).await;
            match &result {
                Ok(address) => {
                    self.enter(CollectionStage::Succeeded);
                    tracing::info!(collection = %address, "Collection deployed");
                }
                Err(e) => {
                    self.enter(CollectionStage::Failed(Failure::from(e)));
                    tracing::error!(error = %e, "Collection creation failed");
                }
            }
            metrics::record_flow("create_collection", result.is_ok());
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, params: CollectionParams) -> MintResult<String> {
        self.enter(CollectionStage::Normalizing);
        let params = params.normalized();

        self.enter(CollectionStage::Submitting);
        let pending = self.submit(params).await?;

        self.enter(CollectionStage::Confirming);
        let receipt = self.confirm(&pending).await?;

        self.enter(CollectionStage::Extracting);
        extract_collection_address(&receipt)
    }

    async fn submit(&self, params: CollectionParams) -> MintResult<PendingTransaction> {
        let request = TransactionRequest {
            target: self.flow.factory,
            description: format!("Create collection {}", params.name),
            call: ContractCall::CreateCollection(params),
        };
        send_tracked(self.flow.submitter.as_ref(), &self.flow.tracker, &request).await
    }

    async fn confirm(&self, pending: &PendingTransaction) -> MintResult<TransactionReceipt> {
        confirm_tracked(self.flow.submitter.as_ref(), &self.flow.tracker, pending).await
    }

    fn enter(&self, stage: CollectionStage) {
        tracing::debug!(stage = %stage, "Collection flow stage");
        self.stage.send_replace(stage);
    }
}
