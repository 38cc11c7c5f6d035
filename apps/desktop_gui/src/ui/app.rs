use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use mint_core::{AppConfig, MintController};
use shared::domain::AccountState;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::toasts::ToastStack;

const HEADING: &str = "Portfolio Token Minting dApp";
const FOOTER_LINK: &str = "https://github.com/rust-master";
const MINT_BUTTON_SIZE: [f32; 2] = [96.0, 28.0];

pub struct MintApp {
    controller: Arc<MintController>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    amount_text: String,
    account: AccountState,
    toasts: ToastStack,
    status: Option<String>,
    chain_label: String,
}

impl MintApp {
    pub fn new(
        config: &AppConfig,
        controller: Arc<MintController>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            amount_text: controller.amount().to_string(),
            account: controller.account(),
            controller,
            cmd_tx,
            ui_rx,
            toasts: ToastStack::new(Duration::from_secs(config.toast_lifetime_secs)),
            status: None,
            chain_label: format!("{} ({})", config.chain.name, config.chain.chain_id),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => tracing::debug!("{message}"),
                UiEvent::Notify(notification) => self.toasts.push(notification),
                UiEvent::AccountChanged(account) => self.account = account,
                UiEvent::BackendFailed(message) => self.status = Some(message),
            }
        }
    }

    /// The wallet session is the source of truth; queued account events only wake the UI.
    fn sync_account(&mut self) {
        self.account = self.controller.account();
    }

    fn on_amount_edited(&mut self) {
        if !self.controller.set_amount_input(&self.amount_text) {
            self.amount_text = self.controller.amount().to_string();
        }
    }

    fn on_mint_clicked(&mut self) {
        let Ok(pending) = self.controller.begin_mint() else {
            return;
        };
        if let Err((cmd, status)) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::SubmitMint(pending))
        {
            if let BackendCommand::SubmitMint(pending) = cmd {
                self.controller.abandon_mint(pending, &status);
            }
            self.status = Some(status);
        }
    }

    fn on_wallet_clicked(&mut self) {
        if let Err((_, status)) = dispatch_backend_command(&self.cmd_tx, BackendCommand::ToggleWallet)
        {
            self.status = Some(status);
        }
    }

    fn show_mint_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.amount_text)
                    .hint_text("Amount to mint")
                    .desired_width(160.0),
            );
            if response.changed() {
                self.on_amount_edited();
            }

            let minting = self.controller.is_minting();
            let label = if minting { "" } else { "Mint" };
            let response = ui.add_enabled(
                self.controller.mint_enabled(),
                egui::Button::new(label).min_size(MINT_BUTTON_SIZE.into()),
            );
            if minting {
                ui.put(response.rect, egui::Spinner::new().size(15.0));
            }
            if response.clicked() {
                self.on_mint_clicked();
            }
        });
    }

    fn show_wallet_section(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(self.account.wallet_button_label())
            .clicked()
        {
            self.on_wallet_clicked();
        }
        ui.label(self.account.display_label());
        ui.label(egui::RichText::new(&self.chain_label).small().weak());
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Made by");
            ui.hyperlink_to("Rust Master", FOOTER_LINK);
            ui.label(egui::RichText::new("\u{2764}").color(egui::Color32::from_rgb(0, 221, 241)));
        });
    }
}

impl eframe::App for MintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.sync_account();
        self.toasts.prune(Instant::now());

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| self.show_footer(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(HEADING);
                ui.add_space(16.0);
                if let Some(status) = &self.status {
                    ui.colored_label(ui.visuals().error_fg_color, status);
                    ui.add_space(8.0);
                }
            });
            ui.group(|ui| self.show_mint_section(ui));
            ui.add_space(12.0);
            ui.group(|ui| self.show_wallet_section(ui));
        });
        self.toasts.show(ctx);

        if self.controller.is_minting() || !self.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
