use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use alloy_network::EthereumWallet;
use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{AccountState, MintAmount, MintReceipt},
    error::MintError,
    notification::{Notification, MINT_SUCCESS_MESSAGE},
};
use tokio::sync::watch;
use tracing::{error, info, warn};

pub mod config;
pub mod contract;
pub mod wallet;

pub use config::AppConfig;
pub use contract::{contract_from_config, AlloyMintContract, MissingMintContract};
pub use wallet::{KeySource, LocalKeyWallet};

/// A connected (or connectable) wallet, consumed through a polled accessor and
/// a change subscription.
#[async_trait]
pub trait WalletSession: Send + Sync {
    async fn open(&self) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
    fn account(&self) -> AccountState;
    fn subscribe(&self) -> watch::Receiver<AccountState>;
    /// Signing handle for the current session, if any.
    fn wallet_provider(&self) -> Option<EthereumWallet>;
}

#[async_trait]
pub trait MintContract: Send + Sync {
    /// Submits `mint(base_units)` and waits for the receipt.
    async fn mint(
        &self,
        wallet: EthereumWallet,
        base_units: U256,
        gas_limit: u64,
    ) -> Result<MintReceipt>;
}

/// Fire-and-forget sink for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Writes notifications to the log only.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            warn!(message = %notification.message, "notification");
        } else {
            info!(message = %notification.message, "notification");
        }
    }
}

/// Which half of the wallet toggle ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletToggle {
    Opened,
    Disconnected,
}

/// A mint that passed its precondition checks and is waiting to be submitted.
#[derive(Clone)]
pub struct PendingMint {
    amount: MintAmount,
    base_units: U256,
    gas_limit: u64,
    wallet: EthereumWallet,
}

impl PendingMint {
    pub fn amount(&self) -> &MintAmount {
        &self.amount
    }

    /// Amount scaled to the token's smallest unit.
    pub fn base_units(&self) -> U256 {
        self.base_units
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }
}

struct MintForm {
    amount: MintAmount,
}

pub struct MintController {
    wallet: Arc<dyn WalletSession>,
    contract: Arc<dyn MintContract>,
    notifier: Arc<dyn Notifier>,
    token_decimals: u8,
    gas_limit: u64,
    form: Mutex<MintForm>,
    minting: AtomicBool,
}

impl MintController {
    pub fn new(
        config: &AppConfig,
        wallet: Arc<dyn WalletSession>,
        contract: Arc<dyn MintContract>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            wallet,
            contract,
            notifier,
            token_decimals: config.token_decimals,
            gas_limit: config.gas_limit,
            form: Mutex::new(MintForm {
                amount: MintAmount::default(),
            }),
            minting: AtomicBool::new(false),
        })
    }

    fn form(&self) -> MutexGuard<'_, MintForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn amount(&self) -> MintAmount {
        self.form().amount.clone()
    }

    /// Applies an edit to the amount field. Invalid text is dropped and the
    /// last valid amount stays in place; returns whether the edit was taken.
    pub fn set_amount_input(&self, input: &str) -> bool {
        match MintAmount::parse(input) {
            Ok(amount) => {
                self.form().amount = amount;
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_minting(&self) -> bool {
        self.minting.load(Ordering::SeqCst)
    }

    /// Whether the mint trigger should accept clicks.
    pub fn mint_enabled(&self) -> bool {
        !self.is_minting()
    }

    pub fn account(&self) -> AccountState {
        self.wallet.account()
    }

    pub fn subscribe_account(&self) -> watch::Receiver<AccountState> {
        self.wallet.subscribe()
    }

    /// Opens the wallet when disconnected and closes it when connected.
    pub async fn toggle_wallet(&self) -> WalletToggle {
        if self.account().is_connected {
            if let Err(err) = self.wallet.disconnect().await {
                self.report(&MintError::WalletDisconnection(format!("{err:#}")));
            }
            WalletToggle::Disconnected
        } else {
            if let Err(err) = self.wallet.open().await {
                self.report(&MintError::WalletConnection(format!("{err:#}")));
            }
            WalletToggle::Opened
        }
    }

    /// Synchronous first half of a mint: checks the session, raises the
    /// in-flight flag and scales the amount. Any failure has already been
    /// notified when this returns `Err`.
    pub fn begin_mint(&self) -> Result<PendingMint, MintError> {
        if !self.account().is_connected {
            let err = MintError::NotConnected;
            self.report(&err);
            return Err(err);
        }

        self.minting.store(true, Ordering::SeqCst);

        let pending = self.prepare();
        if let Err(err) = &pending {
            self.report(err);
            self.minting.store(false, Ordering::SeqCst);
        }
        pending
    }

    fn prepare(&self) -> Result<PendingMint, MintError> {
        let amount = self.amount();
        let base_units = amount.to_base_units(self.token_decimals)?;
        let wallet = self
            .wallet
            .wallet_provider()
            .ok_or_else(|| MintError::Submission("wallet provider unavailable".into()))?;
        info!(%amount, %base_units, "prepared mint");
        Ok(PendingMint {
            amount,
            base_units,
            gas_limit: self.gas_limit,
            wallet,
        })
    }

    /// Second half of a mint: submits, waits for inclusion, notifies once and
    /// clears the in-flight flag whatever the outcome.
    pub async fn complete_mint(&self, pending: PendingMint) -> Result<MintReceipt, MintError> {
        let outcome = self.submit(pending).await;
        match &outcome {
            Ok(receipt) => {
                info!(tx_hash = %receipt.tx_hash, block = ?receipt.block_number, "minted");
                self.notifier.success(MINT_SUCCESS_MESSAGE);
            }
            Err(err) => self.report(err),
        }
        self.minting.store(false, Ordering::SeqCst);
        outcome
    }

    async fn submit(&self, pending: PendingMint) -> Result<MintReceipt, MintError> {
        let receipt = self
            .contract
            .mint(pending.wallet, pending.base_units, pending.gas_limit)
            .await
            .map_err(|err| MintError::Submission(format!("{err:#}")))?;

        if receipt.is_success() {
            Ok(receipt)
        } else {
            Err(MintError::Reverted {
                tx_hash: receipt.tx_hash.to_string(),
                status: receipt.status,
            })
        }
    }

    /// Releases a mint that never reached the contract, reporting it as a
    /// mint failure.
    pub fn abandon_mint(&self, pending: PendingMint, reason: &str) {
        warn!(amount = %pending.amount, reason, "mint abandoned before submission");
        self.report(&MintError::Submission(reason.to_string()));
        self.minting.store(false, Ordering::SeqCst);
    }

    /// Full mint action: precondition check, submission and confirmation.
    pub async fn mint_token(&self) -> Result<MintReceipt, MintError> {
        let pending = self.begin_mint()?;
        self.complete_mint(pending).await
    }

    fn report(&self, err: &MintError) {
        error!(kind = ?err.kind(), "{err}");
        self.notifier.notify(Notification::from(err));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
