use serde::{Serialize, Serializer};
use std::fmt;

use crate::ledger::{Felt, LedgerError};

/// Which transfer a successful transaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferLabel {
    AssetTransfer,
    BalanceTransfer,
}

impl TransferLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferLabel::AssetTransfer => "asset-transfer",
            TransferLabel::BalanceTransfer => "balance-transfer",
        }
    }

    /// Prefix of the status line shown for this transfer.
    pub fn role(&self) -> &'static str {
        match self {
            TransferLabel::AssetTransfer => "NFT transfer",
            TransferLabel::BalanceTransfer => "ETH Transfer",
        }
    }
}

impl fmt::Display for TransferLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    AccountNotFound,
    RecipientNotFound,
    InvalidTokenId,
    NotOwner,
    InsufficientBalance,
    Unexpected(String),
}

impl FailureReason {
    pub fn message(&self) -> &str {
        match self {
            FailureReason::AccountNotFound => "Account does not exist.",
            FailureReason::RecipientNotFound => "Recipient Account does not exist.",
            FailureReason::InvalidTokenId => "ERC721: invalid token ID",
            FailureReason::NotOwner => "You are not the owner of this token.",
            FailureReason::InsufficientBalance => "not enough ETH to proceed.",
            FailureReason::Unexpected(message) => message,
        }
    }

    /// True for failures detected before anything was written on chain.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, FailureReason::Unexpected(_))
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Node and SDK messages reach the user as they were reported.
impl From<LedgerError> for FailureReason {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidArgument(message)
            | LedgerError::RejectedTransaction(message)
            | LedgerError::Transport(message) => FailureReason::Unexpected(message),
            other => FailureReason::Unexpected(other.to_string()),
        }
    }
}

/// One observable outcome of a workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusEvent {
    Failure {
        reason: FailureReason,
    },
    Success {
        transaction_hash: Felt,
        label: TransferLabel,
    },
}

impl StatusEvent {
    pub fn failure(reason: FailureReason) -> Self {
        StatusEvent::Failure { reason }
    }

    pub fn success(transaction_hash: Felt, label: TransferLabel) -> Self {
        StatusEvent::Success {
            transaction_hash,
            label,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StatusEvent::Failure { .. })
    }
}

/// The status line shown to the user.
impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The token lookup failure is shown exactly as the contract reports it.
            StatusEvent::Failure {
                reason: FailureReason::InvalidTokenId,
            } => write!(f, "{}", FailureReason::InvalidTokenId),
            StatusEvent::Failure { reason } => write!(f, "Error: {reason}"),
            StatusEvent::Success {
                transaction_hash,
                label,
            } => write!(f, "{} transaction hash: {transaction_hash}", label.role()),
        }
    }
}
