//! Fungible token minting on an owner-mintable token.

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::pipeline::submitter::{submit_tracked, TransactionSubmitter};
use crate::pipeline::types::{
    ContractCall, MintError, MintResult, TransactionReceipt, TransactionRequest,
};
use crate::tracking::TransactionTracker;

/// The token being minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Mints `amount` tokens to a recipient via `mintTo`.
#[derive(Clone)]
pub struct TokenMintFlow {
    submitter: Arc<dyn TransactionSubmitter>,
    tracker: TransactionTracker,
    token: TokenDetails,
}

impl TokenMintFlow {
    pub fn new(
        submitter: Arc<dyn TransactionSubmitter>,
        tracker: TransactionTracker,
        token: TokenDetails,
    ) -> Self {
        Self {
            submitter,
            tracker,
            token,
        }
    }

    /// Convert a decimal amount in whole tokens into base units.
    pub fn parse_amount(&self, amount: &str) -> MintResult<U256> {
        let amount = amount.trim();
        if amount.starts_with('-') {
            return Err(MintError::InvalidInput("amount must be greater than 0".to_string()));
        }
        let value = parse_units(amount, self.token.decimals)
            .map_err(|e| MintError::InvalidInput(format!("invalid amount '{}': {}", amount, e)))?
            .get_absolute();
        if value.is_zero() {
            return Err(MintError::InvalidInput("amount must be greater than 0".to_string()));
        }
        Ok(value)
    }

    /// Mint to `recipient` and return the confirmed receipt.
    pub async fn mint_to(&self, recipient: &str, amount: &str) -> MintResult<TransactionReceipt> {
        let span = tracing::info_span!("mint_tokens", attempt_id = %Uuid::new_v4());
        async {
            let result = self.execute(recipient, amount).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Token mint failed");
            }
            metrics::record_flow("mint_tokens", result.is_ok());
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, recipient: &str, amount: &str) -> MintResult<TransactionReceipt> {
        let recipient: Address = recipient.trim().parse().map_err(|_| {
            MintError::InvalidInput(format!("'{}' is not an ethereum address", recipient.trim()))
        })?;
        let value = self.parse_amount(amount)?;

        let request = TransactionRequest {
            target: self.token.address,
            call: ContractCall::MintTo {
                recipient,
                amount: value,
            },
            description: format!("Mint {} {}", amount.trim(), self.token.symbol),
        };
        let receipt = submit_tracked(self.submitter.as_ref(), &self.tracker, &request).await?;

        tracing::info!(
            tx_hash = %receipt.transaction_hash,
            recipient = %recipient,
            amount = %value,
            "Tokens minted"
        );
        Ok(receipt)
    }
}
