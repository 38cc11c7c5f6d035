use std::fmt;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::AmountError;

/// Decimals of the minted token; display units are scaled by `10^TOKEN_DECIMALS`.
pub const TOKEN_DECIMALS: u8 = 18;

/// Gas ceiling attached to every mint call.
pub const MINT_GAS_LIMIT: u64 = 500_000;

/// Receipt status reported by a successfully executed transaction.
pub const RECEIPT_STATUS_SUCCESS: u64 = 1;

const TRUNCATED_PREFIX_LEN: usize = 6;
const TRUNCATED_SUFFIX_LEN: usize = 4;
const TRUNCATED_FILLER: &str = ".......";

/// A user-entered mint amount in display units.
///
/// Always a positive integer written without leading zeros. The digits are
/// kept as text so arbitrarily long entries survive until they are scaled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MintAmount(String);

impl MintAmount {
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        if is_valid_amount_input(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(AmountError::Invalid(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scales the amount by `10^decimals` using integer arithmetic only.
    pub fn to_base_units(&self, decimals: u8) -> Result<U256, AmountError> {
        let display = U256::from_str_radix(&self.0, 10)
            .map_err(|_| AmountError::Overflow(self.0.clone()))?;
        let scale = U256::from(10u8)
            .checked_pow(U256::from(decimals))
            .ok_or_else(|| AmountError::Overflow(self.0.clone()))?;
        display
            .checked_mul(scale)
            .ok_or_else(|| AmountError::Overflow(self.0.clone()))
    }
}

impl Default for MintAmount {
    fn default() -> Self {
        Self("1".to_string())
    }
}

impl fmt::Display for MintAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MintAmount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MintAmount> for String {
    fn from(value: MintAmount) -> Self {
        value.0
    }
}

/// Accepts one or more ASCII digits where the first digit is 1-9.
pub fn is_valid_amount_input(input: &str) -> bool {
    let mut bytes = input.bytes();
    match bytes.next() {
        Some(b'1'..=b'9') => bytes.all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Snapshot of the wallet session as seen by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountState {
    pub address: Option<Address>,
    pub is_connected: bool,
}

impl AccountState {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Some(address),
            is_connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Label shown next to the wallet button.
    pub fn display_label(&self) -> String {
        match self.address {
            Some(address) => truncate_address(&address),
            None => "Wallet Not Connected".to_string(),
        }
    }

    pub fn wallet_button_label(&self) -> &'static str {
        if self.is_connected {
            "Disconnect Wallet"
        } else {
            "Connect Wallet"
        }
    }
}

/// `0xAbCd12.......9f3E` style rendering of a checksummed address.
pub fn truncate_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    let suffix_start = full.len() - TRUNCATED_SUFFIX_LEN;
    format!(
        "{}{TRUNCATED_FILLER}{}",
        &full[..TRUNCATED_PREFIX_LEN],
        &full[suffix_start..]
    )
}

/// The part of a transaction receipt the mint flow cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub tx_hash: B256,
    pub status: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl MintReceipt {
    pub fn is_success(&self) -> bool {
        self.status == RECEIPT_STATUS_SUCCESS
    }
}
