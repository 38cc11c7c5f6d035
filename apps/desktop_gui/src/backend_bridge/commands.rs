//! Backend commands queued from UI to backend worker.

use mint_core::PendingMint;

pub enum BackendCommand {
    ToggleWallet,
    /// A mint already accepted by `begin_mint` on the UI thread.
    SubmitMint(PendingMint),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleWallet => "toggle_wallet",
            Self::SubmitMint(_) => "submit_mint",
        }
    }
}
