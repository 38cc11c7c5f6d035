use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must be a positive integer without leading zeros, got {0:?}")]
    Invalid(String),
    #[error("amount {0} does not fit in 256 bits once scaled to base units")]
    Overflow(String),
}

/// Which user action a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    WalletConnection,
    WalletDisconnection,
    NotConnected,
    Mint,
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("wallet connection failed: {0}")]
    WalletConnection(String),
    #[error("wallet disconnection failed: {0}")]
    WalletDisconnection(String),
    #[error("wallet is not connected")]
    NotConnected,
    #[error("mint amount rejected: {0}")]
    Amount(#[from] AmountError),
    #[error("mint submission failed: {0}")]
    Submission(String),
    #[error("mint transaction {tx_hash} finished with status {status}")]
    Reverted { tx_hash: String, status: u64 },
}

impl MintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WalletConnection(_) => ErrorKind::WalletConnection,
            Self::WalletDisconnection(_) => ErrorKind::WalletDisconnection,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::Amount(_) | Self::Submission(_) | Self::Reverted { .. } => ErrorKind::Mint,
        }
    }

    /// The single line shown to the user. Mint failures share one message
    /// regardless of cause.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::WalletConnection => "Connection error.",
            ErrorKind::WalletDisconnection => "Disconnection error.",
            ErrorKind::NotConnected => "Please connect your wallet first.",
            ErrorKind::Mint => "Minting failed. Try again!",
        }
    }
}
