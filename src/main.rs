use anyhow::Result;
use clap::Parser;

use focus_recover::cli::commands::{
    show_how_to_use, ConstantsCommand, InitCommand, TransferCommand,
};
use focus_recover::cli::{Cli, Commands};
use focus_recover::{config, init_telemetry, FocusRecoverConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default behavior: no subcommand - explain how to use the tool
        None => show_how_to_use(),
        Some(Commands::Transfer {
            account,
            token_id,
            recipient,
            include_eth,
            json,
        }) => {
            init_telemetry(&config()?.observability)?;
            let command = TransferCommand {
                account,
                token_id,
                recipient,
                include_eth,
                json,
            };
            let succeeded =
                tokio::runtime::Runtime::new()?.block_on(async { command.execute().await })?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        // These never read the config files, so a broken file can be replaced
        Some(Commands::Init { force }) => {
            init_telemetry(&FocusRecoverConfig::default().observability)?;
            InitCommand::new(force).execute()
        }
        Some(Commands::Constants) => {
            init_telemetry(&FocusRecoverConfig::default().observability)?;
            ConstantsCommand.execute()
        }
    }
}
