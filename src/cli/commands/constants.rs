use anyhow::Result;
use std::io::Write;

use crate::constants::{
    ETH_CONTRACT_ADDRESS, MIN_ETH_BALANCE_WEI, NETWORK_NAME, NFT_CONTRACT_ADDRESS,
};

pub struct ConstantsCommand;

impl ConstantsCommand {
    pub fn execute(&self) -> Result<()> {
        self.write_to(&mut std::io::stdout().lock())
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "network:              {NETWORK_NAME}")?;
        writeln!(out, "nft contract:         {NFT_CONTRACT_ADDRESS}")?;
        writeln!(out, "eth contract:         {ETH_CONTRACT_ADDRESS}")?;
        writeln!(out, "minimum eth balance:  {MIN_ETH_BALANCE_WEI} wei")?;
        Ok(())
    }
}
