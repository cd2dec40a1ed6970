//! Single NFT minting: pin image, pin metadata, mint.
//!
//! Every step consumes the previous step's output, so the order is fixed by
//! data dependency. Content pinned by a failed attempt stays pinned; a retry
//! pins it again.

use alloy::primitives::Address;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::pinning::metadata::{ipfs_uri, MetadataBuilder};
use crate::pinning::{ContentPinner, FileUpload, PinRequest, PinResult};
use crate::pipeline::extract::extract_mint_confirmation;
use crate::pipeline::state::{Failure, MintStage};
use crate::pipeline::submitter::{confirm_tracked, send_tracked, TransactionSubmitter};
use crate::pipeline::types::{
    ContractCall, MintResult, PendingTransaction, TransactionReceipt, TransactionRequest,
};
use crate::tracking::TransactionTracker;

/// Tracker label for single mints.
pub const MINT_DESCRIPTION: &str = "Mint single nft";

/// Input of a single mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub name: String,
    pub description: String,
    pub image: FileUpload,
}

/// Pins an image and its metadata, then mints a token referencing them.
#[derive(Clone)]
pub struct SingleMintFlow {
    pinner: Arc<dyn ContentPinner>,
    submitter: Arc<dyn TransactionSubmitter>,
    tracker: TransactionTracker,
    minter: Address,
}

impl SingleMintFlow {
    pub fn new(
        pinner: Arc<dyn ContentPinner>,
        submitter: Arc<dyn TransactionSubmitter>,
        tracker: TransactionTracker,
        minter: Address,
    ) -> Self {
        Self {
            pinner,
            submitter,
            tracker,
            minter,
        }
    }

    /// Start a fresh attempt with its own progress channel.
    pub fn attempt(&self) -> MintAttempt<'_> {
        let (stage, _) = watch::channel(MintStage::Idle);
        MintAttempt {
            flow: self,
            id: Uuid::new_v4(),
            stage,
        }
    }

    /// Mint one NFT and return the confirmed receipt.
    pub async fn mint(&self, request: MintRequest) -> MintResult<TransactionReceipt> {
        self.attempt().run(request).await
    }
}

/// One invocation of [`SingleMintFlow`].
pub struct MintAttempt<'a> {
    flow: &'a SingleMintFlow,
    id: Uuid,
    stage: watch::Sender<MintStage>,
}

impl MintAttempt<'_> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Subscribe to stage changes.
    pub fn progress(&self) -> watch::Receiver<MintStage> {
        self.stage.subscribe()
    }

    pub fn stage(&self) -> MintStage {
        self.stage.borrow().clone()
    }

    /// Run the attempt to completion.
    pub async fn run(self, request: MintRequest) -> MintResult<TransactionReceipt> {
        let span = tracing::info_span!("mint_nft", attempt_id = %self.id);
        async {
            let result = self.execute(request).await;
            match &result {
                Ok(receipt) => {
                    self.enter(MintStage::Succeeded);
                    tracing::info!(tx_hash = %receipt.transaction_hash, "NFT minted");
                }
                Err(e) => {
                    self.enter(MintStage::Failed(Failure::from(e)));
                    tracing::error!(error = %e, "NFT mint failed");
                }
            }
            metrics::record_flow("mint_nft", result.is_ok());
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, request: MintRequest) -> MintResult<TransactionReceipt> {
        // Nothing is pinned for a request the metadata could never carry.
        MetadataBuilder::check_name(&request.name)?;

        self.enter(MintStage::PinningImage);
        let image = self.pin_image(request.image).await?;

        self.enter(MintStage::PinningMetadata);
        let token_uri = self
            .pin_metadata(&request.name, &request.description, &image)
            .await?;

        self.enter(MintStage::Submitting);
        let pending = self.submit(token_uri).await?;

        self.enter(MintStage::Confirming);
        let receipt = confirm_tracked(self.flow.submitter.as_ref(), &self.flow.tracker, &pending).await?;

        Ok(extract_mint_confirmation(receipt))
    }

    async fn pin_image(&self, image: FileUpload) -> MintResult<PinResult> {
        tracing::debug!(file_name = %image.file_name, size = image.bytes.len(), "Pinning image");
        self.flow.pinner.pin(PinRequest::Binary(image)).await
    }

    /// Pin the metadata document and return its token URI.
    async fn pin_metadata(
        &self,
        name: &str,
        description: &str,
        image: &PinResult,
    ) -> MintResult<String> {
        let metadata = MetadataBuilder::build(name, description, &image.content_id)?;
        let pinned = self.flow.pinner.pin(metadata.into_pin_request()).await?;
        Ok(ipfs_uri(&pinned.content_id))
    }

    async fn submit(&self, token_uri: String) -> MintResult<PendingTransaction> {
        let request = TransactionRequest {
            target: self.flow.minter,
            call: ContractCall::Mint { token_uri },
            description: MINT_DESCRIPTION.to_string(),
        };
        send_tracked(self.flow.submitter.as_ref(), &self.flow.tracker, &request).await
    }

    fn enter(&self, stage: MintStage) {
        tracing::debug!(stage = %stage, "Mint flow stage");
        self.stage.send_replace(stage);
    }
}
