use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use paddock::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for paddock::AppCommand {
    fn from(cmd: Commands) -> paddock::AppCommand {
        match cmd {
            Commands::Status => paddock::AppCommand::Status,
            Commands::Bet { horse, usd } => paddock::AppCommand::Bet { horse, usd },
            Commands::Race { seed } => paddock::AppCommand::Race { seed },
            Commands::Rate => paddock::AppCommand::Rate,
            Commands::History => paddock::AppCommand::History,
            Commands::Delete { id } => paddock::AppCommand::Delete { id },
            Commands::Clear => paddock::AppCommand::Clear,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show balance, exchange rate, pending bet and odds
    Status,
    /// Bet an amount in USD on a horse for the next race
    Bet {
        /// Horse number, 1 to 4
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        horse: u8,
        /// Stake in whole USD
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        usd: u32,
    },
    /// Run the next race and settle the pending bet
    Race {
        /// Seed for a reproducible race
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Fetch the latest USD/TWD exchange rate
    Rate,
    /// Show the betting history
    History,
    /// Delete one betting record
    Delete {
        /// Record id as shown by `history`
        id: u64,
    },
    /// Delete the whole betting history
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => paddock::cli::setup::setup_at_path(path),
            None => paddock::cli::setup::setup(),
        },
        Some(cmd) => paddock::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}
