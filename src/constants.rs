//! Network constants compiled into the binary.
//!
//! These are deliberately not part of the runtime configuration: the tool
//! only ever recovers assets from the Focus Tree collection on mainnet.

use crate::ledger::{Felt, U256};

/// Starknet mainnet network name.
pub const NETWORK_NAME: &str = "SN_MAIN";

/// Chain id of mainnet, the short string `SN_MAIN`.
pub const CHAIN_ID: Felt = Felt::from_limbs([0x0053_4e5f_4d41_494e, 0, 0, 0]);

/// Fungible balance (ETH) contract.
/// 0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7
pub const ETH_CONTRACT_ADDRESS: Felt = Felt::from_limbs([
    0x1562_b82f_9e00_4dc7,
    0x44dd_d6b9_6f7c_741b,
    0x8e99_674b_d3fc_c846,
    0x049d_3657_0d4e_46f4,
]);

/// Non-fungible asset (Focus Tree) contract.
/// 0x0377c2d65debb3978ea81904e7d59740da1f07412e30d01c5ded1c5d6f1ddc43
pub const NFT_CONTRACT_ADDRESS: Felt = Felt::from_limbs([
    0x5ded_1c5d_6f1d_dc43,
    0xda1f_0741_2e30_d01c,
    0x8ea8_1904_e7d5_9740,
    0x0377_c2d6_5deb_b397,
]);

/// Balance kept in reserve for gas, in wei (0.001 ETH).
pub const MIN_ETH_BALANCE_WEI: u64 = 1_000_000_000_000_000;

pub fn min_eth_balance() -> U256 {
    U256::from(MIN_ETH_BALANCE_WEI)
}
