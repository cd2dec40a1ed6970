//! nft-minter command line.
//!
//! ```text
//! nft-minter create-collection --name a --symbol A --user-limit 1 \
//!     --max-supply 5 --price 0.000001 --base-uri ipfs://<cid>
//! nft-minter mint --name "Punk #1" --description "first" --image punk.png
//! nft-minter mint-tokens --token 0x.. --symbol TKN --to 0x.. --amount 1.5
//! nft-minter recent
//! ```

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nft_minter::blockchain::{BlockchainClient, ChainSubmitter, Wallet};
use nft_minter::config::{self, ConfigError, MinterConfig};
use nft_minter::observability::init_logging;
use nft_minter::pinning::{FileUpload, PinataPinner};
use nft_minter::pipeline::{
    CollectionCreationFlow, CollectionParams, MintError, MintRequest, SingleMintFlow,
    TokenDetails, TokenMintFlow, TransactionSubmitter,
};
use nft_minter::tracking::recent::status_counts;
use nft_minter::tracking::{RecentTransactions, TransactionStatus, TransactionTracker};

#[derive(Parser)]
#[command(name = "nft-minter")]
#[command(about = "Deploy NFT collections and mint NFTs with IPFS-pinned metadata", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults apply when it does not exist.
    #[arg(short, long, default_value = "minter.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new collection through the factory
    CreateCollection {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        /// Maximum tokens per address
        #[arg(long)]
        user_limit: u64,
        #[arg(long)]
        max_supply: u64,
        /// Token price in ETH
        #[arg(long)]
        price: String,
        /// Base metadata URI
        #[arg(long)]
        base_uri: String,
    },
    /// Pin an image and its metadata, then mint a single NFT
    Mint {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Image file to pin
        #[arg(long)]
        image: PathBuf,
    },
    /// Mint fungible tokens on a token you own
    MintTokens {
        /// Token contract address
        #[arg(long)]
        token: Address,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in whole tokens
        #[arg(long)]
        amount: String,
    },
    /// List recently submitted transactions
    Recent,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = config::load_or_default(&cli.config)?;
    init_logging(&config.observability);

    tracing::info!(
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        pinning_api = %config.pinning.api_url,
        "Configuration loaded"
    );

    let history = open_history(&config)?;
    if let Commands::Recent = cli.command {
        print_recent(&history);
        return Ok(());
    }

    let wallet = Wallet::from_env(config.blockchain.chain_id)?;
    let client = BlockchainClient::new(config.blockchain.clone(), wallet).await?;
    let submitter: Arc<dyn TransactionSubmitter> = Arc::new(ChainSubmitter::new(client));

    let (tracker, events) = if config.tracking.enabled {
        TransactionTracker::channel()
    } else {
        let (_, rx) = TransactionTracker::channel();
        (TransactionTracker::disabled(), rx)
    };
    let recorder = tokio::spawn(history.clone().run(events));

    let outcome = run_command(cli.command, &config, submitter, tracker).await;

    // Every tracker clone is gone once the command returns.
    if let Err(e) = recorder.await {
        tracing::error!(error = %e, "Transaction recorder task failed");
    }

    match outcome {
        Ok(()) => Ok(()),
        Err(CommandError::Mint(e)) => {
            eprintln!("{}: {}", e.kind().headline(), e);
            std::process::exit(1);
        }
        Err(CommandError::Setup(e)) => Err(e),
    }
}

enum CommandError {
    /// A flow attempt failed.
    Mint(MintError),
    /// The command could not be set up.
    Setup(Box<dyn std::error::Error>),
}

impl From<MintError> for CommandError {
    fn from(e: MintError) -> Self {
        CommandError::Mint(e)
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError::Setup(Box::new(e))
    }
}

async fn run_command(
    command: Commands,
    config: &MinterConfig,
    submitter: Arc<dyn TransactionSubmitter>,
    tracker: TransactionTracker,
) -> Result<(), CommandError> {
    match command {
        Commands::CreateCollection {
            name,
            symbol,
            user_limit,
            max_supply,
            price,
            base_uri,
        } => {
            let factory = contract_address(&config.contracts.collection_factory, "contracts.collection_factory")?;
            let unit_price = parse_ether(price.trim())
                .map_err(|e| MintError::InvalidInput(format!("invalid price '{}': {}", price, e)))?;
            let params = CollectionParams {
                name,
                symbol,
                user_limit,
                max_supply,
                unit_price,
                base_uri,
            };

            let flow = CollectionCreationFlow::new(submitter, tracker, factory);
            let attempt = flow.attempt();
            let mut progress = attempt.progress();
            tokio::spawn(async move {
                while progress.changed().await.is_ok() {
                    let stage = progress.borrow_and_update().clone();
                    eprintln!("» {}", stage);
                }
            });

            let address = attempt.run(params).await?;
            println!("Collection deployed at {}", address);
        }
        Commands::Mint {
            name,
            description,
            image,
        } => {
            let minter = contract_address(&config.contracts.nft_minter, "contracts.nft_minter")?;
            let pinner = Arc::new(PinataPinner::new(&config.pinning)?);
            let image = read_image(&image).await?;

            let flow = SingleMintFlow::new(pinner, submitter, tracker, minter);
            let attempt = flow.attempt();
            let mut progress = attempt.progress();
            tokio::spawn(async move {
                while progress.changed().await.is_ok() {
                    let stage = progress.borrow_and_update().clone();
                    eprintln!("» {}", stage);
                }
            });

            let receipt = attempt
                .run(MintRequest {
                    name,
                    description,
                    image,
                })
                .await?;
            println!("NFT minted in transaction {}", receipt.transaction_hash);
        }
        Commands::MintTokens {
            token,
            symbol,
            decimals,
            to,
            amount,
        } => {
            let flow = TokenMintFlow::new(
                submitter,
                tracker,
                TokenDetails {
                    address: token,
                    symbol: symbol.clone(),
                    decimals,
                },
            );
            let receipt = flow.mint_to(&to, &amount).await?;
            println!(
                "Successfully minted {} {} in transaction {}",
                amount.trim(),
                symbol,
                receipt.transaction_hash
            );
        }
        Commands::Recent => {}
    }
    Ok(())
}

fn contract_address(value: &str, setting: &'static str) -> Result<Address, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Missing(setting));
    }
    // Validation has already checked the format.
    value.parse().map_err(|_| ConfigError::Missing(setting))
}

fn open_history(config: &MinterConfig) -> Result<RecentTransactions, Box<dyn std::error::Error>> {
    let max_entries = config.tracking.max_entries;
    Ok(match &config.tracking.history_path {
        Some(path) if config.tracking.enabled => RecentTransactions::load_from_file(path, max_entries)?,
        _ => RecentTransactions::new(max_entries, None),
    })
}

async fn read_image(path: &Path) -> Result<FileUpload, MintError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MintError::InvalidInput(format!("cannot read image {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    let upload = FileUpload::new(file_name, bytes);
    Ok(match image_content_type(path) {
        Some(content_type) => upload.with_content_type(content_type),
        None => upload,
    })
}

fn image_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

fn print_recent(history: &RecentTransactions) {
    let entries = history.list();
    if entries.is_empty() {
        println!("No recent transactions");
        return;
    }
    let counts = status_counts(&entries);
    println!(
        "{} recent transactions ({} pending, {} confirmed, {} failed)",
        entries.len(),
        counts.get("pending").copied().unwrap_or(0),
        counts.get("confirmed").copied().unwrap_or(0),
        counts.get("failed").copied().unwrap_or(0)
    );
    for entry in entries {
        let status = match &entry.status {
            TransactionStatus::Pending => "pending".to_string(),
            TransactionStatus::Confirmed => "confirmed".to_string(),
            TransactionStatus::Failed { reason } => format!("failed ({})", reason),
        };
        println!("{}  {:<10}  {}", entry.hash, status, entry.description);
    }
}
