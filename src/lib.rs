// focus-recover library - Starknet NFT recovery workflow
// Exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod constants;
pub mod ledger;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::{config, FocusRecoverConfig};
pub use ledger::{
    AccountKey, ContractCall, ContractInterface, Felt, LedgerClient, LedgerError, SecretKey,
    ThrottleSettings, ThrottledLedger, U256,
};
pub use telemetry::{create_transfer_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    run_transfer, run_transfer_with, FailureReason, StatusEvent, TransferLabel, TransferRequest,
    TransferWorkflow,
};
