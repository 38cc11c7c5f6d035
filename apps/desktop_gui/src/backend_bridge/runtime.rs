//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use mint_core::MintController;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(
    controller: Arc<MintController>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut account_updates = controller.subscribe_account();
            let account_tx = ui_tx.clone();
            tokio::spawn(async move {
                while account_updates.changed().await.is_ok() {
                    let account = *account_updates.borrow_and_update();
                    if let Err(err) = account_tx.try_send(UiEvent::AccountChanged(account)) {
                        tracing::warn!("dropping account update for ui: {err}");
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::ToggleWallet => {
                        let action = controller.toggle_wallet().await;
                        tracing::info!(?action, "backend: toggle_wallet");
                    }
                    BackendCommand::SubmitMint(pending) => {
                        tracing::info!(amount = %pending.amount(), "backend: submit_mint");
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            if let Err(err) = controller.complete_mint(pending).await {
                                tracing::error!("backend: submit_mint failed: {err}");
                            }
                        });
                    }
                }
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    });
}
