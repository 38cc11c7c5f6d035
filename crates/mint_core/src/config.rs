use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use shared::domain::{MINT_GAS_LIMIT, TOKEN_DECIMALS};
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "mint_dapp.toml";
pub const DEFAULT_PRIVATE_KEY_ENV: &str = "MINT_PRIVATE_KEY";

const DEFAULT_PROJECT_ID: &str = "8ad813f72792250629f434f63aa93b32";
const DEFAULT_RPC_URL: &str =
    "https://bsc-testnet.core.chainstack.com/a6ac3e4320de6a11032f3eba5d3a0d1e";
const DEFAULT_EXPLORER_URL: &str = "https://testnet.bscscan.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("mint contract address is not configured; set contract_address or MINT_CONTRACT_ADDRESS")]
    MissingContractAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub currency: String,
    pub explorer_url: Url,
    pub rpc_url: Url,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 97,
            name: "BNB Chain".into(),
            currency: "BNB".into(),
            explorer_url: Url::parse(DEFAULT_EXPLORER_URL).expect("static explorer url"),
            rpc_url: Url::parse(DEFAULT_RPC_URL).expect("static rpc url"),
        }
    }
}

impl ChainConfig {
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url.as_str().trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "Portfolio Token dApp".into(),
            description: "Portfolio token minting dApp".into(),
            url: "https://mywebsite.com".into(),
            icons: vec!["https://avatars.mywebsite.com/".into()],
        }
    }
}

/// Application-wide settings, built once at startup and handed to constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project_id: String,
    pub chain: ChainConfig,
    pub metadata: AppMetadata,
    pub contract_address: Option<Address>,
    pub gas_limit: u64,
    pub token_decimals: u8,
    /// Name of the environment variable holding the signing key.
    pub private_key_env: String,
    pub toast_lifetime_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.into(),
            chain: ChainConfig::default(),
            metadata: AppMetadata::default(),
            contract_address: None,
            gas_limit: MINT_GAS_LIMIT,
            token_decimals: TOKEN_DECIMALS,
            private_key_env: DEFAULT_PRIVATE_KEY_ENV.into(),
            toast_lifetime_secs: 5,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist; otherwise `mint_dapp.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let env_value = |keys: &[&'static str]| {
            keys.iter().rev().find_map(|key| {
                lookup(key)
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| (*key, value.trim().to_string()))
            })
        };

        if let Some((key, value)) = env_value(&["MINT_RPC_URL", "APP__RPC_URL"]) {
            self.chain.rpc_url = parse_value(key, &value)?;
        }
        if let Some((key, value)) = env_value(&["MINT_CONTRACT_ADDRESS", "APP__CONTRACT_ADDRESS"]) {
            self.contract_address = Some(parse_value(key, &value)?);
        }
        if let Some((key, value)) = env_value(&["APP__CHAIN_ID"]) {
            self.chain.chain_id = parse_value(key, &value)?;
        }
        if let Some((key, value)) = env_value(&["APP__GAS_LIMIT"]) {
            self.gas_limit = parse_value(key, &value)?;
        }
        if let Some((_, value)) = env_value(&["APP__PROJECT_ID"]) {
            self.project_id = value;
        }
        if let Some((_, value)) = env_value(&["MINT_PRIVATE_KEY_ENV"]) {
            self.private_key_env = value;
        }

        Ok(())
    }

    pub fn require_contract_address(&self) -> Result<Address, ConfigError> {
        self.contract_address
            .ok_or(ConfigError::MissingContractAddress)
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use alloy_primitives::address;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_bnb_testnet() {
        let config = AppConfig::default();
        assert_eq!(config.chain.chain_id, 97);
        assert_eq!(config.chain.currency, "BNB");
        assert_eq!(config.gas_limit, 500_000);
        assert_eq!(config.token_decimals, 18);
        assert!(config.contract_address.is_none());
        assert_eq!(config.private_key_env, "MINT_PRIVATE_KEY");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            contract_address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"

            [chain]
            rpc_url = "http://127.0.0.1:8545"
            "#,
        )
        .expect("parse");

        assert_eq!(
            config.contract_address,
            Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );
        assert_eq!(config.chain.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.chain.chain_id, 97);
        assert_eq!(config.metadata.name, "Portfolio Token dApp");
    }

    #[test]
    fn app_prefixed_env_wins_over_short_name() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env_of(&[
                ("MINT_RPC_URL", "http://short.example"),
                ("APP__RPC_URL", "http://prefixed.example"),
                ("APP__GAS_LIMIT", "750000"),
            ]))
            .expect("overrides");

        assert_eq!(config.chain.rpc_url.as_str(), "http://prefixed.example/");
        assert_eq!(config.gas_limit, 750_000);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env_of(&[("MINT_CONTRACT_ADDRESS", "   ")]))
            .expect("overrides");
        assert!(config.contract_address.is_none());
    }

    #[test]
    fn malformed_env_value_is_reported_with_its_key() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env_of(&[("APP__CHAIN_ID", "bnb")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidValue { key: "APP__CHAIN_ID", .. }));
    }

    #[test]
    fn missing_contract_address_is_a_config_error() {
        assert!(matches!(
            AppConfig::default().require_contract_address(),
            Err(ConfigError::MissingContractAddress)
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("mint_dapp_missing_{suffix}.toml"));
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn explorer_tx_url_has_single_separator() {
        let chain = ChainConfig::default();
        assert_eq!(
            chain.tx_url("0xabc"),
            "https://testnet.bscscan.com/tx/0xabc"
        );
    }
}
