use anyhow::Result;

pub mod constants;
pub mod init;
pub mod transfer;

pub use constants::ConstantsCommand;
pub use init::InitCommand;
pub use transfer::{TransferCommand, TransferReport};

pub fn show_how_to_use() -> Result<()> {
    println!("🌳 focus-recover - move a Focus Tree NFT to another Starknet account");
    println!();
    println!("To get started:");
    println!("  🚚 focus-recover transfer --account 0x123...789 --token-id 1337 --recipient 0x123...789");
    println!("     add --include-eth to also send the remaining ETH");
    println!("  ⚙️  focus-recover init       # Write a default focus-recover.toml");
    println!("  📜 focus-recover constants  # Show contract addresses and gas reserve");
    println!();
    println!("🔑 The private key is read from FOCUS_RECOVER_PRIVATE_KEY or from stdin.");
    println!("   Never share your private key with a party you do not trust.");
    Ok(())
}
