use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use mint_core::{contract_from_config, AppConfig, LocalKeyWallet, MintController};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiEvent, UiNotifier};
use crate::ui::MintApp;

#[derive(Parser, Debug)]
struct Args {
    /// Config file; defaults to ./mint_dapp.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load config, falling back to defaults: {err}");
            let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                "Config error: {err}. Using built-in defaults."
            )));
            AppConfig::default()
        }
    };
    tracing::info!(
        app = %config.metadata.name,
        chain_id = config.chain.chain_id,
        project_id = %config.project_id,
        "starting mint front end"
    );

    let controller = MintController::new(
        &config,
        Arc::new(LocalKeyWallet::from_config(&config)),
        contract_from_config(&config),
        Arc::new(UiNotifier::new(ui_tx.clone())),
    );
    backend_bridge::runtime::launch(controller.clone(), cmd_rx, ui_tx);

    let title = config.metadata.name.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([560.0, 380.0])
            .with_min_inner_size([420.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(MintApp::new(&config, controller, cmd_tx, ui_rx)))),
    )
}
