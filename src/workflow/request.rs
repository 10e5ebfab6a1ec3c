use thiserror::Error;

use crate::ledger::{parse_u256, AccountKey, Felt, FeltParseError, SecretKey, U256};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {source}")]
pub struct RequestError {
    pub field: &'static str,
    #[source]
    pub source: FeltParseError,
}

fn invalid(field: &'static str) -> impl FnOnce(FeltParseError) -> RequestError {
    move |source| RequestError { field, source }
}

/// Everything one workflow run needs, fixed at submit time.
///
/// Fields are private so a request cannot change once built; the workflow
/// consumes it by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    sender_address: Felt,
    sender_secret: SecretKey,
    asset_id: U256,
    recipient_address: Felt,
    include_residual_balance: bool,
}

impl TransferRequest {
    pub fn new(
        sender_address: Felt,
        sender_secret: SecretKey,
        asset_id: U256,
        recipient_address: Felt,
        include_residual_balance: bool,
    ) -> Self {
        Self {
            sender_address,
            sender_secret,
            asset_id,
            recipient_address,
            include_residual_balance,
        }
    }

    /// Builds a request from the raw text a user typed in.
    pub fn from_input(
        account_address: &str,
        private_key: &str,
        token_id: &str,
        recipient_address: &str,
        include_eth: bool,
    ) -> Result<Self, RequestError> {
        let sender_address = account_address
            .parse::<Felt>()
            .map_err(invalid("account address"))?;
        let sender_secret = private_key
            .parse::<Felt>()
            .map(SecretKey::new)
            .map_err(invalid("private key"))?;
        let asset_id = parse_u256(token_id).map_err(invalid("token id"))?;
        let recipient_address = recipient_address
            .parse::<Felt>()
            .map_err(invalid("recipient address"))?;

        Ok(Self::new(
            sender_address,
            sender_secret,
            asset_id,
            recipient_address,
            include_eth,
        ))
    }

    pub fn sender_address(&self) -> Felt {
        self.sender_address
    }

    pub fn asset_id(&self) -> U256 {
        self.asset_id
    }

    pub fn recipient_address(&self) -> Felt {
        self.recipient_address
    }

    pub fn include_residual_balance(&self) -> bool {
        self.include_residual_balance
    }

    /// Hands over the signing identity. Only the workflow's account handle
    /// should call this.
    pub(crate) fn account_key(&self) -> AccountKey {
        AccountKey {
            address: self.sender_address,
            secret: self.sender_secret.clone(),
        }
    }
}
