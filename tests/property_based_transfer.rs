// Property-Based Testing for the transfer workflow
// Checks value encoding and the balance gate under arbitrary inputs

use async_trait::async_trait;
use focus_recover::constants::{ETH_CONTRACT_ADDRESS, MIN_ETH_BALANCE_WEI};
use focus_recover::ledger::{
    parse_u256, u256_from_felts, u256_to_felts, AccountKey, ContractCall, ContractInterface,
    EntryPoint, Felt, LedgerClient, LedgerError, Mutability, Param, SecretKey, U256,
};
use focus_recover::{run_transfer, FailureReason, StatusEvent, TransferRequest};
use proptest::prelude::*;

const SENDER: u64 = 0x5e4d;
const RECIPIENT: u64 = 0x7ec1;

// Ledger where both accounts exist, the sender owns every token and the
// balance is fixed.
struct FixedBalanceLedger {
    balance: U256,
}

#[async_trait]
impl LedgerClient for FixedBalanceLedger {
    async fn get_deployed_code(&self, _address: Felt) -> Result<Vec<u8>, LedgerError> {
        Ok(vec![1])
    }

    async fn get_contract_interface(&self, _address: Felt) -> Result<ContractInterface, LedgerError> {
        Ok(ContractInterface::new(vec![
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
        ]))
    }

    async fn call_read(&self, call: &ContractCall) -> Result<Vec<Felt>, LedgerError> {
        if call.contract_address == ETH_CONTRACT_ADDRESS {
            Ok(u256_to_felts(self.balance).to_vec())
        } else {
            Ok(vec![Felt::from(SENDER)])
        }
    }

    async fn estimate_fee(&self, _account: &AccountKey, _call: &ContractCall) -> Result<U256, LedgerError> {
        Ok(U256::from(1_000u64))
    }

    async fn submit_write(&self, _account: &AccountKey, _call: &ContractCall) -> Result<Felt, LedgerError> {
        Ok(Felt::from(0xabcu64))
    }
}

fn request(token_id: U256, include_eth: bool) -> TransferRequest {
    TransferRequest::new(
        Felt::from(SENDER),
        SecretKey::new(Felt::from(0x5ec7u64)),
        token_id,
        Felt::from(RECIPIENT),
        include_eth,
    )
}

fn u256_strategy() -> impl Strategy<Value = U256> {
    any::<[u64; 4]>().prop_map(U256)
}

proptest! {
    #[test]
    fn hex_and_decimal_spellings_agree(value in any::<u128>()) {
        let from_hex: Felt = format!("{value:#x}").parse().unwrap();
        let from_decimal: Felt = value.to_string().parse().unwrap();
        prop_assert_eq!(from_hex, from_decimal);
        prop_assert_eq!(from_hex, Felt::from(value));
    }

    #[test]
    fn leading_zeros_do_not_change_an_address(value in any::<u64>(), zeros in 0usize..40) {
        let padded = format!("0x{}{value:x}", "0".repeat(zeros));
        prop_assert_eq!(padded.parse::<Felt>().unwrap(), Felt::from(value));
    }

    #[test]
    fn u256_words_split_at_128_bits(value in u256_strategy()) {
        let [low, high] = u256_to_felts(value);
        prop_assert!(low.to_u256().bits() <= 128);
        prop_assert!(high.to_u256().bits() <= 128);
        prop_assert_eq!(u256_from_felts(low, high).unwrap(), value);
        prop_assert_eq!(parse_u256(&value.to_string()).unwrap(), value);
    }

    #[test]
    fn balance_gate_matches_the_reserve(balance in 0u64..=4 * MIN_ETH_BALANCE_WEI, token in u256_strategy()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ledger = FixedBalanceLedger { balance: U256::from(balance) };

        let events = runtime.block_on(run_transfer(request(token, false), &ledger));

        if balance <= MIN_ETH_BALANCE_WEI {
            prop_assert_eq!(events, vec![StatusEvent::failure(FailureReason::InsufficientBalance)]);
        } else {
            prop_assert_eq!(events.len(), 1);
            prop_assert!(!events[0].is_failure());
        }
    }

    #[test]
    fn at_most_one_failure_and_it_comes_last(balance in 0u64..=4 * MIN_ETH_BALANCE_WEI, include_eth in any::<bool>()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ledger = FixedBalanceLedger { balance: U256::from(balance) };

        let events = runtime.block_on(run_transfer(request(U256::from(1u64), include_eth), &ledger));

        let failures = events.iter().filter(|e| e.is_failure()).count();
        prop_assert!(failures <= 1);
        if failures == 1 {
            prop_assert!(events.last().unwrap().is_failure());
        }
        let max_events = if include_eth { 2 } else { 1 };
        prop_assert!(events.len() <= max_events, "{} events for at most {}", events.len(), max_events);
    }
}
