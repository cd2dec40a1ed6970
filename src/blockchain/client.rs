//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary broadcasts, failovers read)
//! - Query chain state (block number, receipts, gas price)
//! - Fill and sign transactions locally, so the hash is known before broadcast
//! - Broadcast raw transactions through the primary endpoint
//! - Handle timeouts and network errors gracefully

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers). Only the primary broadcasts.
    providers: Vec<SharedProvider>,
    /// Configuration.
    config: BlockchainConfig,
    /// Signer behind the primary provider.
    wallet: Wallet,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// # Arguments
    /// * `config` - Blockchain configuration
    /// * `wallet` - Signer for outgoing transactions
    ///
    /// # Returns
    /// A new client or error if the primary URL is invalid
    pub async fn new(config: BlockchainConfig, wallet: Wallet) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Primary provider: reads and broadcasts
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as SharedProvider);

        // 2. Failover providers for reads
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            wallet,
            timeout_duration,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    signer = %client.wallet.address(),
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Run a read against each endpoint in turn until one answers.
    async fn read<T, E, F, Fut>(&self, what: &'static str, op: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, call = what, error = %e, "RPC error, trying next provider")
                }
                Err(_) => tracing::warn!(provider_idx = i, call = what, "RPC timeout, trying next provider"),
            }
        }
        Err(BlockchainError::Rpc(format!("All RPC providers failed: {}", what)))
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.read("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.read("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// Get a transaction receipt by hash; `None` while still pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.read("eth_getTransactionReceipt", |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.read("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
    }

    /// Refuse to proceed while gas is above the configured ceiling.
    pub async fn check_gas_price(&self) -> BlockchainResult<()> {
        let gas_price_gwei = self.get_gas_price().await? / 1_000_000_000;
        if gas_price_gwei > self.config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.config.max_gas_price_gwei,
            });
        }
        Ok(())
    }

    /// Fill nonce, gas, fees and chain id from the primary endpoint and sign
    /// with the local wallet. Nothing leaves the process but reads.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxEnvelope> {
        let from = self.wallet.address();
        let provider = self.provider();

        let nonce = self
            .bounded("eth_getTransactionCount", provider.get_transaction_count(from).pending())
            .await?;
        let tx = tx
            .with_from(from)
            .with_nonce(nonce)
            .with_chain_id(self.wallet.chain_id());
        let gas_limit = self
            .bounded("eth_estimateGas", provider.estimate_gas(tx.clone()))
            .await?;
        let fees = self
            .bounded("eth_feeHistory", provider.estimate_eip1559_fees())
            .await?;

        tx.with_gas_limit(gas_limit)
            .with_max_fee_per_gas(fees.max_fee_per_gas)
            .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
            .build(&self.wallet.ethereum_wallet())
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Failed to sign transaction: {}", e)))
    }

    /// Broadcast a signed transaction through the primary provider.
    ///
    /// Never retried on failover endpoints, so a transaction is broadcast at
    /// most once. A node that accepts the connection but does not answer in
    /// time yields `BroadcastUnacknowledged` carrying the hash.
    pub async fn broadcast(&self, envelope: &TxEnvelope) -> BlockchainResult<TxHash> {
        let hash = *envelope.tx_hash();
        let raw = envelope.encoded_2718();
        match timeout(self.timeout_duration, self.provider().send_raw_transaction(&raw)).await {
            Ok(Ok(_)) => Ok(hash),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("Transaction rejected: {}", e))),
            Err(_) => Err(BlockchainError::BroadcastUnacknowledged {
                hash,
                waited_secs: self.config.rpc_timeout_secs,
            }),
        }
    }

    /// Sign `tx` locally, then broadcast it.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let envelope = self.sign_transaction(tx).await?;
        self.broadcast(&envelope).await
    }

    async fn bounded<T, E, Fut>(&self, what: &'static str, fut: Fut) -> BlockchainResult<T>
    where
        Fut: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("{} failed: {}", what, e))),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get the underlying primary provider.
    pub fn provider(&self) -> &(dyn Provider + Send + Sync) {
        self.providers[0].as_ref()
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Get the signing wallet.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("signer", &self.wallet.address())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
