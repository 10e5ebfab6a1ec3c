// Recording ledger double for workflow tests - no network, no side effects

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use super::*;

/// Every ledger interaction, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    GetDeployedCode { address: Felt },
    GetContractInterface { address: Felt },
    CallRead { call: ContractCall },
    EstimateFee { account: Felt, call: ContractCall },
    SubmitWrite { account: Felt, call: ContractCall },
}

/// Ledger that answers from scripted state and records what it was asked.
#[derive(Debug)]
pub struct ScriptedLedger {
    deployed: Mutex<HashSet<Felt>>,
    interface: Mutex<Result<ContractInterface, LedgerError>>,
    owner: Mutex<Result<Felt, LedgerError>>,
    balances: Mutex<VecDeque<U256>>,
    fee: Mutex<Result<U256, LedgerError>>,
    write_results: Mutex<VecDeque<Result<Felt, LedgerError>>>,
    executed_commands: Mutex<Vec<LedgerCommand>>,
}

impl Default for ScriptedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self {
            deployed: Mutex::new(HashSet::new()),
            interface: Mutex::new(Ok(nft_interface())),
            owner: Mutex::new(Err(LedgerError::InvalidArgument(
                "ERC721: invalid token ID".to_string(),
            ))),
            balances: Mutex::new(VecDeque::new()),
            fee: Mutex::new(Ok(U256::zero())),
            write_results: Mutex::new(VecDeque::new()),
            executed_commands: Mutex::new(Vec::new()),
        }
    }

    pub fn deploy(&self, address: Felt) -> &Self {
        self.deployed.lock().unwrap().insert(address);
        self
    }

    pub fn set_interface(&self, interface: Result<ContractInterface, LedgerError>) -> &Self {
        *self.interface.lock().unwrap() = interface;
        self
    }

    pub fn set_owner(&self, owner: Result<Felt, LedgerError>) -> &Self {
        *self.owner.lock().unwrap() = owner;
        self
    }

    /// Balances returned by successive `balanceOf` reads. The last one repeats.
    pub fn set_balances(&self, balances: Vec<U256>) -> &Self {
        *self.balances.lock().unwrap() = balances.into();
        self
    }

    pub fn set_fee(&self, fee: Result<U256, LedgerError>) -> &Self {
        *self.fee.lock().unwrap() = fee;
        self
    }

    pub fn push_write_result(&self, result: Result<Felt, LedgerError>) -> &Self {
        self.write_results.lock().unwrap().push_back(result);
        self
    }

    pub fn get_executed_commands(&self) -> Vec<LedgerCommand> {
        self.executed_commands.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<ContractCall> {
        self.get_executed_commands()
            .into_iter()
            .filter_map(|command| match command {
                LedgerCommand::SubmitWrite { call, .. } => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn clear_executed_commands(&self) {
        self.executed_commands.lock().unwrap().clear();
    }

    fn record(&self, command: LedgerCommand) {
        self.executed_commands.lock().unwrap().push(command);
    }

    fn next_balance(&self) -> Result<U256, LedgerError> {
        let mut balances = self.balances.lock().unwrap();
        match balances.len() {
            0 => Err(LedgerError::Transport("no balance scripted".to_string())),
            1 => Ok(balances[0]),
            _ => Ok(balances.pop_front().unwrap_or_default()),
        }
    }
}

/// Interface of the non-fungible asset contract as a node would report it.
pub fn nft_interface() -> ContractInterface {
    ContractInterface::new(vec![
        EntryPoint {
            name: "owner_of".to_string(),
            inputs: vec![Param::new("token_id", "core::integer::u256")],
            outputs: vec!["core::starknet::contract_address::ContractAddress".to_string()],
            mutability: Mutability::View,
        },
        EntryPoint {
            name: "transfer_from".to_string(),
            inputs: vec![
                Param::new("from", "core::starknet::contract_address::ContractAddress"),
                Param::new("to", "core::starknet::contract_address::ContractAddress"),
                Param::new("token_id", "core::integer::u256"),
            ],
            outputs: vec![],
            mutability: Mutability::External,
        },
    ])
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn get_deployed_code(&self, address: Felt) -> Result<Vec<u8>, LedgerError> {
        self.record(LedgerCommand::GetDeployedCode { address });
        if self.deployed.lock().unwrap().contains(&address) {
            Ok(address.to_bytes_be().to_vec())
        } else {
            Ok(Vec::new())
        }
    }

    async fn get_contract_interface(
        &self,
        address: Felt,
    ) -> Result<ContractInterface, LedgerError> {
        self.record(LedgerCommand::GetContractInterface { address });
        self.interface.lock().unwrap().clone()
    }

    async fn call_read(&self, call: &ContractCall) -> Result<Vec<Felt>, LedgerError> {
        self.record(LedgerCommand::CallRead { call: call.clone() });
        match call.entrypoint.as_str() {
            "owner_of" => self.owner.lock().unwrap().clone().map(|owner| vec![owner]),
            "balanceOf" => self.next_balance().map(|balance| u256_to_felts(balance).to_vec()),
            other => Err(LedgerError::InvalidArgument(format!(
                "unscripted entrypoint {other}"
            ))),
        }
    }

    async fn estimate_fee(
        &self,
        account: &AccountKey,
        call: &ContractCall,
    ) -> Result<U256, LedgerError> {
        self.record(LedgerCommand::EstimateFee {
            account: account.address,
            call: call.clone(),
        });
        self.fee.lock().unwrap().clone()
    }

    async fn submit_write(
        &self,
        account: &AccountKey,
        call: &ContractCall,
    ) -> Result<Felt, LedgerError> {
        self.record(LedgerCommand::SubmitWrite {
            account: account.address,
            call: call.clone(),
        });
        self.write_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LedgerError::RejectedTransaction("no write scripted".to_string())))
    }
}
