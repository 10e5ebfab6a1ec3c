use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "focus-recover")]
#[command(about = "Recover a Focus Tree NFT, and optionally the remaining ETH, into another Starknet account")]
#[command(long_about = "focus-recover checks that both accounts exist, that you own the token and that \
                       enough ETH is left for gas, then transfers the token to the recipient. \
                       This tool has not been developed by the Focus Tree team. Use it at your own risk.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transfer a token (and optionally the remaining ETH) to the recipient
    Transfer {
        /// Account currently holding the token
        #[arg(long, help = "Account Address: 0x123...789")]
        account: String,
        /// Token to move
        #[arg(long, help = "Token ID: 1337")]
        token_id: String,
        /// Account receiving the token
        #[arg(long, help = "Recipient Address: 0x123...789")]
        recipient: String,
        /// Also send the remaining ETH balance, minus the network fee
        #[arg(long, help = "Transfer remaining $ETH after the token")]
        include_eth: bool,
        /// Print a JSON run report instead of status lines
        #[arg(long, help = "Print a JSON run report instead of status lines")]
        json: bool,
    },
    /// Write a default focus-recover.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },
    /// Show the network constants compiled into this build
    Constants,
}
