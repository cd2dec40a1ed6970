//! Transaction submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Check the gas ceiling, encode calldata, sign locally and broadcast
//! - Keep the hash of a broadcast the node never acknowledged
//! - Monitor confirmations on the Tokio timer until the wait policy runs out
//! - Convert the confirmed receipt into the pipeline's event-log view

use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::rpc::types::{TransactionReceipt as RpcReceipt, TransactionRequest as RpcRequest};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contracts::encode_call;
use crate::blockchain::receipt::from_rpc_receipt;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::pipeline::submitter::TransactionSubmitter;
use crate::pipeline::types::{
    MintResult, PendingTransaction, TransactionReceipt, TransactionRequest,
};

/// Submits pipeline transactions through a [`BlockchainClient`].
#[derive(Debug, Clone)]
pub struct ChainSubmitter {
    client: BlockchainClient,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl ChainSubmitter {
    /// Create a submitter using the client's confirmation settings.
    pub fn new(client: BlockchainClient) -> Self {
        let config = client.config();
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let confirmation_timeout = Duration::from_secs(config.confirmation_timeout_secs);
        Self {
            client,
            poll_interval,
            confirmation_timeout,
        }
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// Lookup failures are logged and retried on the next tick; only the
    /// overall deadline ends the wait.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<RpcReceipt> {
        let required_confirmations = self.client.confirmation_blocks();

        let result = timeout(self.confirmation_timeout, async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(format!(
                        "transaction {} reverted in block {}",
                        tx_hash,
                        receipt.block_number.unwrap_or_default()
                    )));
                }

                // Depth 1 means "mined"; deeper policies need the chain head.
                if required_confirmations <= 1 {
                    return Ok(receipt);
                }
                let current_block = match self.client.get_block_number().await {
                    Ok(block) => block,
                    Err(e) => {
                        tracing::warn!(error = %e, "Block number lookup failed");
                        continue;
                    }
                };
                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

                if confirmations >= required_confirmations {
                    return Ok(receipt);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                hash: tx_hash,
                waited_secs: self.confirmation_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl TransactionSubmitter for ChainSubmitter {
    async fn send(&self, request: &TransactionRequest) -> MintResult<PendingTransaction> {
        self.client.check_gas_price().await?;

        let tx = RpcRequest::default()
            .with_from(self.client.wallet().address())
            .with_to(request.target)
            .with_input(encode_call(&request.call));
        let hash = match self.client.send_transaction(tx).await {
            Ok(hash) => hash,
            // Already out of our hands: let the confirmation deadline decide.
            Err(BlockchainError::BroadcastUnacknowledged { hash, waited_secs }) => {
                tracing::warn!(
                    tx_hash = %hash,
                    waited_secs,
                    "Broadcast not acknowledged, waiting for confirmation anyway"
                );
                hash
            }
            Err(e) => return Err(e.into()),
        };

        Ok(PendingTransaction {
            hash,
            description: request.description.clone(),
        })
    }

    async fn confirm(&self, pending: &PendingTransaction) -> MintResult<TransactionReceipt> {
        let receipt = self.wait_for_confirmation(pending.hash).await?;
        Ok(from_rpc_receipt(&receipt))
    }
}
