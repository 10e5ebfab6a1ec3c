// Transfer workflow - ordered checks, then irreversible writes.
//
// Every step awaits the previous one. The first failure ends the run; nothing
// already submitted is rolled back and nothing is retried.

use tracing::{debug, info, warn, Instrument};

use super::events::{FailureReason, StatusEvent, TransferLabel};
use super::handles::{AccountHandle, AssetContractHandle};
use super::request::TransferRequest;
use crate::constants::{min_eth_balance, ETH_CONTRACT_ADDRESS, NFT_CONTRACT_ADDRESS};
use crate::ledger::{u256_from_felts, u256_to_felts, ContractInterface, Felt, LedgerClient, LedgerError, U256};
use crate::telemetry::{create_transfer_span, generate_correlation_id};

const OWNER_OF: &str = "owner_of";
const TRANSFER_FROM: &str = "transfer_from";
const BALANCE_OF: &str = "balanceOf";
const TRANSFER: &str = "transfer";

/// Runs the transfer pipeline for one request and returns every event.
pub async fn run_transfer<L>(request: TransferRequest, ledger: &L) -> Vec<StatusEvent>
where
    L: LedgerClient + ?Sized,
{
    TransferWorkflow::new(ledger).run(request).await
}

/// Like [`run_transfer`], additionally handing each event to `on_event` the
/// moment it is produced.
pub async fn run_transfer_with<L, F>(request: TransferRequest, ledger: &L, on_event: F) -> Vec<StatusEvent>
where
    L: LedgerClient + ?Sized,
    F: FnMut(&StatusEvent) + Send,
{
    TransferWorkflow::new(ledger).run_with(request, on_event).await
}

/// Stateless transfer orchestrator. Holds nothing but the ledger reference,
/// so consecutive runs cannot influence each other.
pub struct TransferWorkflow<'a, L: ?Sized> {
    ledger: &'a L,
    correlation_id: Option<String>,
}

impl<'a, L: LedgerClient + ?Sized> TransferWorkflow<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            correlation_id: None,
        }
    }

    /// Tags the run's tracing span; a fresh id is generated otherwise.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub async fn run(&self, request: TransferRequest) -> Vec<StatusEvent> {
        self.run_with(request, |_| {}).await
    }

    pub async fn run_with<F>(&self, request: TransferRequest, mut on_event: F) -> Vec<StatusEvent>
    where
        F: FnMut(&StatusEvent) + Send,
    {
        let correlation_id = self
            .correlation_id
            .clone()
            .unwrap_or_else(generate_correlation_id);
        let span = create_transfer_span(&correlation_id, &request);

        let mut events = Vec::new();
        let mut emit = |event: StatusEvent| {
            on_event(&event);
            events.push(event);
        };

        let outcome = self.execute(&request, &mut emit).instrument(span.clone()).await;

        if let Err(reason) = outcome {
            span.in_scope(|| {
                if reason.is_precondition() {
                    info!(reason = %reason, "transfer stopped by failed check");
                } else {
                    warn!(reason = %reason, "transfer failed");
                }
            });
            emit(StatusEvent::failure(reason));
        }

        events
    }

    async fn execute(
        &self,
        request: &TransferRequest,
        emit: &mut (dyn FnMut(StatusEvent) + Send),
    ) -> Result<(), FailureReason> {
        let sender = request.sender_address();
        let recipient = request.recipient_address();

        if self.ledger.get_deployed_code(sender).await?.is_empty() {
            return Err(FailureReason::AccountNotFound);
        }
        if self.ledger.get_deployed_code(recipient).await?.is_empty() {
            return Err(FailureReason::RecipientNotFound);
        }
        debug!("sender and recipient accounts are deployed");

        // Only now that both accounts exist is a signing capability built.
        let account = AccountHandle::new(self.ledger, request.account_key());
        let nft_interface = self.ledger.get_contract_interface(NFT_CONTRACT_ADDRESS).await?;
        let nft = AssetContractHandle::new(self.ledger, NFT_CONTRACT_ADDRESS, nft_interface)
            .connect(&account);

        let token_id = u256_to_felts(request.asset_id());
        let owner = match nft
            .read(OWNER_OF, token_id.to_vec())
            .await
            .and_then(|words| first_word(OWNER_OF, &words))
        {
            Ok(owner) => owner,
            Err(err) => {
                debug!(error = %err, "owner lookup failed");
                return Err(FailureReason::InvalidTokenId);
            }
        };
        if owner != sender {
            debug!(owner = %owner, "token belongs to another account");
            return Err(FailureReason::NotOwner);
        }

        let eth = AssetContractHandle::new(self.ledger, ETH_CONTRACT_ADDRESS, ContractInterface::erc20())
            .connect(&account);
        let balance = read_balance(&eth, sender).await?;
        if balance <= min_eth_balance() {
            debug!(balance = %balance, "balance below gas reserve");
            return Err(FailureReason::InsufficientBalance);
        }

        let mut calldata = vec![sender, recipient];
        calldata.extend(token_id);
        let hash = nft.invoke(TRANSFER_FROM, calldata).await?;
        info!(transaction_hash = %hash, "asset transfer submitted");
        emit(StatusEvent::success(hash, TransferLabel::AssetTransfer));

        if !request.include_residual_balance() {
            return Ok(());
        }

        // The asset transfer paid gas, so the balance is read again.
        let balance = read_balance(&eth, sender).await?;
        let fee = eth
            .estimate_fee(TRANSFER, transfer_calldata(recipient, balance))
            .await?;
        let amount = balance.checked_sub(fee).ok_or_else(|| {
            FailureReason::Unexpected(format!(
                "estimated fee {fee} exceeds remaining balance {balance}"
            ))
        })?;
        debug!(balance = %balance, fee = %fee, amount = %amount, "residual transfer computed");

        let hash = eth.invoke(TRANSFER, transfer_calldata(recipient, amount)).await?;
        info!(transaction_hash = %hash, "balance transfer submitted");
        emit(StatusEvent::success(hash, TransferLabel::BalanceTransfer));

        Ok(())
    }
}

async fn read_balance<L>(eth: &AssetContractHandle<'_, L>, holder: Felt) -> Result<U256, LedgerError>
where
    L: LedgerClient + ?Sized,
{
    let words = eth.read(BALANCE_OF, vec![holder]).await?;
    match words.as_slice() {
        [low, high, ..] => Ok(u256_from_felts(*low, *high)?),
        _ => Err(LedgerError::MalformedResponse {
            operation: BALANCE_OF.to_string(),
            message: format!("expected a u256, got {} words", words.len()),
        }),
    }
}

fn transfer_calldata(recipient: Felt, amount: U256) -> Vec<Felt> {
    let mut calldata = vec![recipient];
    calldata.extend(u256_to_felts(amount));
    calldata
}

fn first_word(entrypoint: &str, words: &[Felt]) -> Result<Felt, LedgerError> {
    words.first().copied().ok_or_else(|| LedgerError::MalformedResponse {
        operation: entrypoint.to_string(),
        message: "empty result".to_string(),
    })
}
