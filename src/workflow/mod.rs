// Transfer workflow: request model, status events, contract handles and the
// orchestration engine that ties them together.

pub mod engine;
pub mod events;
pub mod handles;
pub mod request;


pub use engine::{run_transfer, run_transfer_with, TransferWorkflow};
pub use events::{FailureReason, StatusEvent, TransferLabel};
pub use handles::{AccountHandle, AssetContractHandle};
pub use request::{RequestError, TransferRequest};
