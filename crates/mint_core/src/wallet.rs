//! Wallet session backed by a locally held private key.

use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_network::EthereumWallet;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::domain::AccountState;
use tokio::sync::watch;
use tracing::info;
use zeroize::Zeroizing;

use crate::{config::AppConfig, WalletSession};

/// Where the signing key comes from when the session is opened.
pub enum KeySource {
    /// Read from the named environment variable on every `open()`.
    Env(String),
    Inline(Zeroizing<String>),
}

pub struct LocalKeyWallet {
    key_source: KeySource,
    chain_id: u64,
    signer: Mutex<Option<PrivateKeySigner>>,
    account: watch::Sender<AccountState>,
}

impl LocalKeyWallet {
    pub fn new(key_source: KeySource, chain_id: u64) -> Self {
        let (account, _) = watch::channel(AccountState::disconnected());
        Self {
            key_source,
            chain_id,
            signer: Mutex::new(None),
            account,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(KeySource::Env(config.private_key_env.clone()), config.chain.chain_id)
    }

    pub fn with_private_key(private_key: impl Into<String>, chain_id: u64) -> Self {
        Self::new(KeySource::Inline(Zeroizing::new(private_key.into())), chain_id)
    }

    fn signer_slot(&self) -> MutexGuard<'_, Option<PrivateKeySigner>> {
        self.signer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_signer(&self) -> Result<PrivateKeySigner> {
        let raw = match &self.key_source {
            KeySource::Env(var) => Zeroizing::new(
                std::env::var(var)
                    .with_context(|| format!("signing key variable {var} is not set"))?,
            ),
            KeySource::Inline(key) => key.clone(),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("signing key is empty"));
        }
        let signer: PrivateKeySigner = trimmed
            .parse()
            .map_err(|err| anyhow!("invalid signing key: {err}"))?;
        Ok(signer.with_chain_id(Some(self.chain_id)))
    }
}

#[async_trait]
impl WalletSession for LocalKeyWallet {
    async fn open(&self) -> Result<()> {
        if self.signer_slot().is_some() {
            return Ok(());
        }

        let signer = self.load_signer()?;
        let address = signer.address();
        *self.signer_slot() = Some(signer);
        self.account.send_replace(AccountState::connected(address));
        info!(%address, chain_id = self.chain_id, "wallet session opened");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if self.signer_slot().take().is_some() {
            info!("wallet session closed");
        }
        self.account.send_replace(AccountState::disconnected());
        Ok(())
    }

    fn account(&self) -> AccountState {
        *self.account.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<AccountState> {
        self.account.subscribe()
    }

    fn wallet_provider(&self) -> Option<EthereumWallet> {
        self.signer_slot().clone().map(EthereumWallet::from)
    }
}

#[cfg(test)]
#[path = "tests/wallet_tests.rs"]
mod tests;
