use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launchpad_core::config::DEFAULT_CONFIG_FILE;
use launchpad_core::{
    create_token, LaunchContext, LaunchpadConfig, LocalKeypairWallet, RpcLedgerClient,
    TokenRequest, UploadcareStorage,
};

/// Environment variable that overrides `uploadcare.public_key`.
const UPLOADCARE_KEY_ENV: &str = "UPLOADCARE_PUB_KEY";

#[derive(Parser, Debug)]
#[command(name = "launchpad")]
#[command(about = "Launch a Token-2022 mint with on-chain metadata")]
struct Cli {
    /// Configuration file (defaults to ./launchpad.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a mint, upload its metadata and mint the initial supply
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        symbol: String,

        /// Image URL stored in the metadata document
        #[arg(long)]
        image_url: String,

        /// Initial supply in base units
        #[arg(long)]
        supply: String,

        /// Wallet keypair file, overriding `wallet.keypair_path`
        #[arg(short, long)]
        keypair: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite the file if it already exists
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Create {
            name,
            symbol,
            image_url,
            supply,
            keypair,
        } => {
            // Validate input before touching the network.
            let request = TokenRequest::parse(name, symbol, image_url, &supply)?;
            let config = load_config(cli.config.as_deref())?;
            run_create(request, config, keypair).await
        }
        Command::Init { path, force } => {
            let config = LaunchpadConfig::default();
            if force {
                config.save(&path)?;
            } else {
                config
                    .save_new(&path)
                    .with_context(|| format!("not overwriting {}, pass --force to replace it", path.display()))?;
            }
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("launchpad={log_level},launchpad_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<LaunchpadConfig> {
    let mut config = LaunchpadConfig::load(path).context("loading configuration")?;
    if let Ok(key) = std::env::var(UPLOADCARE_KEY_ENV) {
        config.uploadcare.public_key = key;
    }
    Ok(config)
}

async fn run_create(
    request: TokenRequest,
    config: LaunchpadConfig,
    keypair: Option<PathBuf>,
) -> Result<()> {
    let keypair_path = keypair.unwrap_or_else(|| PathBuf::from(&config.wallet.keypair_path));
    let wallet = LocalKeypairWallet::from_file(&keypair_path)
        .context("loading wallet keypair")?
        .with_confirmation(config.confirmation.enabled);
    let ledger = RpcLedgerClient::from_config(&config)?;
    let storage = UploadcareStorage::new(config.uploadcare.clone())?;

    info!(
        rpc = %ledger.url(),
        wallet = %wallet.address(),
        name = %request.name,
        symbol = %request.symbol,
        supply = request.initial_supply,
        "launching token"
    );

    let ctx = LaunchContext::new(&storage, &ledger, &wallet);
    let receipt = create_token(&request, &ctx).await?;

    println!("{receipt}");
    println!("Metadata: {}", receipt.metadata_uri);
    for (stage, signature) in launchpad_core::TransactionStage::ALL
        .iter()
        .zip(&receipt.signatures)
    {
        println!("  {stage}: {signature}");
    }

    Ok(())
}
