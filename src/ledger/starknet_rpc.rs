//! Starknet JSON-RPC backend.
//!
//! Thin adapter over the `starknet` SDK: the provider answers reads, a
//! single-owner account built per call signs and submits writes. All reads use
//! the pending block so a balance read right after a write sees its gas cost,
//! and so the second write of a run gets a fresh nonce.

use ::starknet::accounts::{Account, AccountError, ExecutionEncoding, SingleOwnerAccount};
use ::starknet::core::types::{
    BlockId, BlockTag, Call, ContractClass, Felt as SnFelt, FunctionCall, StarknetError,
};
use ::starknet::core::utils::get_selector_from_name;
use ::starknet::providers::jsonrpc::HttpTransport;
use ::starknet::providers::{JsonRpcClient, Provider, ProviderError, Url};
use ::starknet::signers::{LocalWallet, SigningKey};
use async_trait::async_trait;
use std::fmt;
use tracing::debug;

use super::{
    AccountKey, ContractCall, ContractInterface, Felt, LedgerClient, LedgerError, U256,
};
use crate::constants::CHAIN_ID;

const PENDING: BlockId = BlockId::Tag(BlockTag::Pending);

pub struct StarknetLedger {
    provider: JsonRpcClient<HttpTransport>,
}

impl fmt::Debug for StarknetLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarknetLedger").finish_non_exhaustive()
    }
}

impl StarknetLedger {
    pub fn new(rpc_url: &str) -> Result<Self, LedgerError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| LedgerError::InvalidArgument(format!("rpc url '{rpc_url}': {e}")))?;
        Ok(Self {
            provider: JsonRpcClient::new(HttpTransport::new(url)),
        })
    }

    /// Cairo 0 accounts expect the legacy multicall encoding.
    async fn encoding_for(&self, address: SnFelt) -> Result<ExecutionEncoding, LedgerError> {
        match self.provider.get_class_at(PENDING, address).await {
            Ok(ContractClass::Legacy(_)) => Ok(ExecutionEncoding::Legacy),
            Ok(ContractClass::Sierra(_)) => Ok(ExecutionEncoding::New),
            Err(err) => Err(provider_error(err)),
        }
    }

    async fn account(
        &self,
        key: &AccountKey,
    ) -> Result<SingleOwnerAccount<&JsonRpcClient<HttpTransport>, LocalWallet>, LedgerError> {
        let address = to_sn(key.address);
        let encoding = self.encoding_for(address).await?;
        let signer = LocalWallet::from(SigningKey::from_secret_scalar(to_sn(key.secret.expose())));

        let mut account =
            SingleOwnerAccount::new(&self.provider, signer, address, to_sn(CHAIN_ID), encoding);
        account.set_block_id(PENDING);
        Ok(account)
    }
}

fn to_sn(felt: Felt) -> SnFelt {
    SnFelt::from_bytes_be(&felt.to_bytes_be())
}

fn from_sn(felt: SnFelt) -> Result<Felt, LedgerError> {
    Ok(Felt::from_bytes_be(&felt.to_bytes_be())?)
}

fn selector(entrypoint: &str) -> Result<SnFelt, LedgerError> {
    get_selector_from_name(entrypoint)
        .map_err(|e| LedgerError::InvalidArgument(format!("entrypoint '{entrypoint}': {e}")))
}

fn to_sn_call(call: &ContractCall) -> Result<Call, LedgerError> {
    Ok(Call {
        to: to_sn(call.contract_address),
        selector: selector(&call.entrypoint)?,
        calldata: call.calldata.iter().copied().map(to_sn).collect(),
    })
}

fn provider_error(err: ProviderError) -> LedgerError {
    match &err {
        ProviderError::StarknetError(StarknetError::ContractError(_))
        | ProviderError::StarknetError(StarknetError::EntrypointNotFound) => {
            LedgerError::InvalidArgument(err.to_string())
        }
        _ => LedgerError::Transport(err.to_string()),
    }
}

fn account_error<S: fmt::Display>(err: AccountError<S>) -> LedgerError {
    match err {
        AccountError::Provider(ProviderError::StarknetError(inner)) => {
            LedgerError::RejectedTransaction(ProviderError::StarknetError(inner).to_string())
        }
        AccountError::Provider(other) => LedgerError::Transport(other.to_string()),
        other => LedgerError::RejectedTransaction(other.to_string()),
    }
}

#[async_trait]
impl LedgerClient for StarknetLedger {
    async fn get_deployed_code(&self, address: Felt) -> Result<Vec<u8>, LedgerError> {
        match self.provider.get_class_hash_at(PENDING, to_sn(address)).await {
            Ok(class_hash) => Ok(class_hash.to_bytes_be().to_vec()),
            Err(ProviderError::StarknetError(StarknetError::ContractNotFound)) => Ok(Vec::new()),
            Err(err) => Err(provider_error(err)),
        }
    }

    async fn get_contract_interface(
        &self,
        address: Felt,
    ) -> Result<ContractInterface, LedgerError> {
        let class = match self.provider.get_class_at(PENDING, to_sn(address)).await {
            Ok(class) => class,
            Err(ProviderError::StarknetError(StarknetError::ContractNotFound)) => {
                return Err(LedgerError::ContractNotFound(address))
            }
            Err(err) => return Err(provider_error(err)),
        };

        match class {
            ContractClass::Sierra(sierra) => ContractInterface::from_abi_json(&sierra.abi),
            ContractClass::Legacy(legacy) => {
                let abi = serde_json::to_value(legacy.abi.unwrap_or_default()).map_err(|e| {
                    LedgerError::MalformedResponse {
                        operation: "get_contract_interface".to_string(),
                        message: e.to_string(),
                    }
                })?;
                ContractInterface::from_abi_value(&abi)
            }
        }
    }

    async fn call_read(&self, call: &ContractCall) -> Result<Vec<Felt>, LedgerError> {
        let request = FunctionCall {
            contract_address: to_sn(call.contract_address),
            entry_point_selector: selector(&call.entrypoint)?,
            calldata: call.calldata.iter().copied().map(to_sn).collect(),
        };
        debug!(entrypoint = %call.entrypoint, contract = %call.contract_address, "starknet_call");

        let result = self
            .provider
            .call(request, PENDING)
            .await
            .map_err(provider_error)?;
        result.into_iter().map(from_sn).collect()
    }

    /// Suggested max fee: the node's estimate plus half, which is what wallets
    /// reserve so the transfer of `balance - fee` cannot run short on gas.
    async fn estimate_fee(
        &self,
        account: &AccountKey,
        call: &ContractCall,
    ) -> Result<U256, LedgerError> {
        let signer = self.account(account).await?;
        let estimate = signer
            .execute_v1(vec![to_sn_call(call)?])
            .estimate_fee()
            .await
            .map_err(account_error)?;

        let overall = from_sn(estimate.overall_fee)?.to_u256();
        Ok(overall + overall / 2)
    }

    async fn submit_write(
        &self,
        account: &AccountKey,
        call: &ContractCall,
    ) -> Result<Felt, LedgerError> {
        let signer = self.account(account).await?;
        let result = signer
            .execute_v1(vec![to_sn_call(call)?])
            .send()
            .await
            .map_err(account_error)?;
        from_sn(result.transaction_hash)
    }
}
