use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use mint_core::{
    contract_from_config, AppConfig, LocalKeyWallet, MintController, Notifier, WalletSession,
    WalletToggle,
};
use shared::{domain::MintAmount, notification::Notification};
use tracing_subscriber::EnvFilter;

/// Connect a wallet and mint tokens once.
#[derive(Parser, Debug)]
struct Args {
    /// Amount to mint in whole tokens.
    #[arg(long, default_value = "1", value_parser = MintAmount::parse)]
    amount: MintAmount,
    /// Config file; defaults to ./mint_dapp.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hex private key. Falls back to the variable named by `private_key_env`.
    #[arg(long)]
    private_key: Option<String>,
    /// Print the receipt as JSON.
    #[arg(long)]
    json: bool,
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            eprintln!("error: {}", notification.message);
        } else {
            println!("{}", notification.message);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;
    tracing::info!(
        chain_id = config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        amount = %args.amount,
        "starting headless mint"
    );
    let wallet: Arc<dyn WalletSession> = match args.private_key {
        Some(key) => Arc::new(LocalKeyWallet::with_private_key(key, config.chain.chain_id)),
        None => Arc::new(LocalKeyWallet::from_config(&config)),
    };
    let controller = MintController::new(
        &config,
        wallet,
        contract_from_config(&config),
        Arc::new(ConsoleNotifier),
    );
    controller.set_amount_input(args.amount.as_str());

    if controller.toggle_wallet().await != WalletToggle::Opened
        || !controller.account().is_connected
    {
        bail!("wallet session could not be opened");
    }
    println!(
        "Connected {} on {} ({})",
        controller.account().display_label(),
        config.chain.name,
        config.chain.chain_id
    );

    let outcome = controller.mint_token().await;
    let closed = controller.toggle_wallet().await;
    tracing::info!(?closed, ok = outcome.is_ok(), "mint attempt finished");
    let receipt = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!("{}", config.chain.tx_url(&receipt.tx_hash.to_string()));
    }

    Ok(())
}
