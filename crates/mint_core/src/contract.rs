use std::sync::Arc;

use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::domain::MintReceipt;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::{AppConfig, ConfigError},
    MintContract,
};

sol! {
    interface IMintableToken {
        function mint(uint256 amount) external;
    }
}

/// Sends `mint(uint256)` to a deployed token over JSON-RPC.
#[derive(Debug, Clone)]
pub struct AlloyMintContract {
    rpc_url: Url,
    address: Address,
    chain_id: u64,
}

impl AlloyMintContract {
    pub fn new(rpc_url: Url, address: Address, chain_id: u64) -> Self {
        Self {
            rpc_url,
            address,
            chain_id,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.chain.rpc_url.clone(),
            config.require_contract_address()?,
            config.chain.chain_id,
        ))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Transaction calling `mint(base_units)` on the token with a fixed gas limit.
    fn mint_request(&self, base_units: U256, gas_limit: u64) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.address)
            .with_input(IMintableToken::mintCall { amount: base_units }.abi_encode())
            .with_gas_limit(gas_limit)
    }

    /// Runs the mint against an already connected, signing provider.
    ///
    /// Nothing is sent when the endpoint reports a chain other than the configured one.
    pub async fn mint_with<P: Provider>(
        &self,
        provider: &P,
        base_units: U256,
        gas_limit: u64,
    ) -> Result<MintReceipt> {
        let remote_chain_id = provider
            .get_chain_id()
            .await
            .context("failed to query chain id from rpc endpoint")?;
        if remote_chain_id != self.chain_id {
            return Err(anyhow!(
                "rpc endpoint is on chain {remote_chain_id}, expected {}",
                self.chain_id
            ));
        }

        let pending = provider
            .send_transaction(self.mint_request(base_units, gas_limit))
            .await
            .context("mint transaction was not accepted")?;
        info!(tx_hash = %pending.tx_hash(), "mint transaction submitted");

        let receipt = pending
            .get_receipt()
            .await
            .context("failed waiting for mint receipt")?;
        debug!(?receipt, "mint receipt received");

        Ok(mint_receipt(&receipt))
    }
}

fn mint_receipt<R: ReceiptResponse>(receipt: &R) -> MintReceipt {
    MintReceipt {
        tx_hash: receipt.transaction_hash(),
        status: u64::from(receipt.status()),
        block_number: receipt.block_number(),
    }
}

#[async_trait]
impl MintContract for AlloyMintContract {
    async fn mint(
        &self,
        wallet: EthereumWallet,
        base_units: U256,
        gas_limit: u64,
    ) -> Result<MintReceipt> {
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());
        self.mint_with(&provider, base_units, gas_limit).await
    }
}

/// Stand-in used when no contract address is configured.
pub struct MissingMintContract;

#[async_trait]
impl MintContract for MissingMintContract {
    async fn mint(
        &self,
        _wallet: EthereumWallet,
        _base_units: U256,
        _gas_limit: u64,
    ) -> Result<MintReceipt> {
        Err(ConfigError::MissingContractAddress.into())
    }
}

/// Picks the live contract client when configured, the missing stand-in otherwise.
pub fn contract_from_config(config: &AppConfig) -> Arc<dyn MintContract> {
    match AlloyMintContract::from_config(config) {
        Ok(contract) => Arc::new(contract),
        Err(err) => {
            warn!("{err}; mint requests will fail until it is set");
            Arc::new(MissingMintContract)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy_consensus::{Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom};
    use alloy_primitives::{address, Bloom, TxKind, B256, U64};
    use alloy_rpc_types_eth::TransactionReceipt;
    use alloy_signer_local::PrivateKeySigner;
    use alloy_transport::mock::Asserter;
    use tokio::net::TcpListener;

    use super::*;

    const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    fn anvil_wallet() -> EthereumWallet {
        EthereumWallet::from(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .parse::<PrivateKeySigner>()
                .expect("key"),
        )
    }

    fn receipt_with_status(success: bool) -> TransactionReceipt {
        TransactionReceipt {
            inner: ReceiptEnvelope::Legacy(ReceiptWithBloom {
                receipt: Receipt {
                    status: Eip658Value::Eip658(success),
                    cumulative_gas_used: 52_000,
                    logs: vec![],
                },
                logs_bloom: Bloom::ZERO,
            }),
            transaction_hash: B256::repeat_byte(0xab),
            transaction_index: Some(0),
            block_hash: Some(B256::repeat_byte(0x01)),
            block_number: Some(42),
            gas_used: 52_000,
            effective_gas_price: 1_000_000_000,
            blob_gas_used: None,
            blob_gas_price: None,
            from: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            to: Some(TOKEN),
            contract_address: None,
        }
    }

    #[test]
    fn mint_call_uses_standard_selector_and_encoding() {
        let call = IMintableToken::mintCall {
            amount: U256::from(5_000_000_000_000_000_000u128),
        };
        let encoded = call.abi_encode();
        // keccak256("mint(uint256)")[..4]
        assert_eq!(&encoded[..4], &[0xa0, 0x71, 0x2d, 0x68]);
        assert_eq!(encoded.len(), 4 + 32);
        assert_eq!(U256::from_be_slice(&encoded[4..]), call.amount);
    }

    #[test]
    fn mint_request_targets_token_with_fixed_gas_limit() {
        let contract = AlloyMintContract::new(
            Url::parse("http://127.0.0.1:8545").expect("url"),
            TOKEN,
            97,
        );
        let amount = U256::from(3_000_000_000_000_000_000u128);
        let request = contract.mint_request(amount, 500_000);

        assert_eq!(request.to, Some(TxKind::Call(TOKEN)));
        assert_eq!(request.gas, Some(500_000));
        let input = request.input.input().expect("calldata");
        assert_eq!(
            input.as_ref(),
            IMintableToken::mintCall { amount }.abi_encode().as_slice()
        );
    }

    #[test]
    fn receipt_status_maps_to_one_or_zero() {
        let ok = mint_receipt(&receipt_with_status(true));
        assert_eq!(ok.status, 1);
        assert!(ok.is_success());
        assert_eq!(ok.block_number, Some(42));
        assert_eq!(ok.tx_hash, B256::repeat_byte(0xab));

        let reverted = mint_receipt(&receipt_with_status(false));
        assert_eq!(reverted.status, 0);
        assert!(!reverted.is_success());
    }

    #[tokio::test]
    async fn wrong_chain_is_refused_before_sending() {
        let asserter = Asserter::new();
        asserter.push_success(&U64::from(56));
        asserter.push_failure_msg("no further request expected");
        let provider = ProviderBuilder::new()
            .wallet(anvil_wallet())
            .connect_mocked_client(asserter.clone());
        let contract = AlloyMintContract::new(
            Url::parse("http://127.0.0.1:8545").expect("url"),
            TOKEN,
            97,
        );

        let err = contract
            .mint_with(&provider, U256::from(1u8), 500_000)
            .await
            .expect_err("chain 56 must be refused");

        assert!(err.to_string().contains("expected 97"), "{err:#}");
        assert_eq!(asserter.read_q().len(), 1);
    }

    #[tokio::test]
    async fn https_endpoint_is_dialed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let server = tokio::spawn(async move { listener.accept().await.is_ok() });

        let contract = AlloyMintContract::new(
            Url::parse(&format!("https://127.0.0.1:{port}")).expect("url"),
            TOKEN,
            97,
        );
        let err = tokio::time::timeout(
            Duration::from_secs(10),
            contract.mint(anvil_wallet(), U256::from(1u8), 500_000),
        )
        .await
        .expect("mint attempt finishes")
        .expect_err("listener does not speak tls");

        assert!(!format!("{err:#}").contains("scheme is not http"), "{err:#}");
        let accepted = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("listener finishes")
            .expect("listener task");
        assert!(accepted);
    }

    #[test]
    fn config_without_address_is_rejected() {
        assert!(matches!(
            AlloyMintContract::from_config(&AppConfig::default()),
            Err(ConfigError::MissingContractAddress)
        ));
    }

    #[test]
    fn config_with_address_builds_client() {
        let mut config = AppConfig::default();
        config.contract_address = Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        let contract = AlloyMintContract::from_config(&config).expect("client");
        assert_eq!(
            contract.address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[tokio::test]
    async fn missing_contract_always_fails() {
        let err = MissingMintContract
            .mint(anvil_wallet(), U256::from(1u8), 500_000)
            .await
            .expect_err("must fail");
        assert!(err.to_string().contains("not configured"));
    }
}
