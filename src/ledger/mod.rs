//! Ledger client abstraction
//!
//! The transfer workflow only talks to the chain through [`LedgerClient`].
//! Concrete backends (the Starknet JSON-RPC adapter, the throttling wrapper,
//! test doubles) all implement the same trait.

pub mod felt;
pub mod interface;
pub mod throttle;

#[cfg(feature = "starknet")]
pub mod starknet_rpc;

#[cfg(test)]
pub mod mocks;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

pub use felt::{parse_u256, u256_from_felts, u256_to_felts, Felt, FeltParseError, U256};
pub use interface::{ContractInterface, EntryPoint, Mutability, Param};
pub use throttle::{ThrottleSettings, ThrottledLedger};

#[cfg(feature = "starknet")]
pub use starknet_rpc::StarknetLedger;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("transaction rejected: {0}")]
    RejectedTransaction(String),
    #[error("contract not found: {0}")]
    ContractNotFound(Felt),
    #[error("entrypoint '{entrypoint}' is not part of the interface of {contract}")]
    UnknownEntrypoint { contract: Felt, entrypoint: String },
    #[error("'{entrypoint}' needs a connected account")]
    NotConnected { entrypoint: String },
    #[error("malformed response from {operation}: {message}")]
    MalformedResponse { operation: String, message: String },
    #[error("{operation} timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<FeltParseError> for LedgerError {
    fn from(err: FeltParseError) -> Self {
        LedgerError::MalformedResponse {
            operation: "decode".to_string(),
            message: err.to_string(),
        }
    }
}

/// A single contract invocation, read or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub contract_address: Felt,
    pub entrypoint: String,
    pub calldata: Vec<Felt>,
}

impl ContractCall {
    pub fn new(contract_address: Felt, entrypoint: &str, calldata: Vec<Felt>) -> Self {
        Self {
            contract_address,
            entrypoint: entrypoint.to_string(),
            calldata,
        }
    }
}

/// Account private key. Never printed, never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Felt);

impl SecretKey {
    pub fn new(scalar: Felt) -> Self {
        Self(scalar)
    }

    pub fn expose(&self) -> Felt {
        self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Signing identity handed to the ledger for fee estimation and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountKey {
    pub address: Felt,
    pub secret: SecretKey,
}

/// Ledger operations the transfer workflow depends on.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Code deployed at `address`; empty when no contract lives there.
    async fn get_deployed_code(&self, address: Felt) -> Result<Vec<u8>, LedgerError>;

    /// Interface descriptor of the contract at `address`.
    async fn get_contract_interface(&self, address: Felt)
        -> Result<ContractInterface, LedgerError>;

    /// Read-only call. Fails with `InvalidArgument` when the target does not exist.
    async fn call_read(&self, call: &ContractCall) -> Result<Vec<Felt>, LedgerError>;

    /// Network fee for submitting `call` from `account`.
    async fn estimate_fee(&self, account: &AccountKey, call: &ContractCall)
        -> Result<U256, LedgerError>;

    /// Signs and submits `call`, returning the transaction hash.
    async fn submit_write(&self, account: &AccountKey, call: &ContractCall)
        -> Result<Felt, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_key_debug_is_redacted() {
        let key = SecretKey::new("0xdeadbeef".parse().unwrap());
        let account = AccountKey {
            address: Felt::from(1u64),
            secret: key,
        };
        let rendered = format!("{account:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("deadbeef"));
    }

    #[test]
    fn ledger_errors_render_their_context() {
        let err = LedgerError::Timeout {
            operation: "call_read".to_string(),
            duration_ms: 1500,
        };
        assert_eq!(err.to_string(), "call_read timed out after 1500ms");

        let err = LedgerError::UnknownEntrypoint {
            contract: Felt::from(0xabcu64),
            entrypoint: "mint".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "entrypoint 'mint' is not part of the interface of 0xabc"
        );
    }
}
