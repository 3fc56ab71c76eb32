pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::Game;
use crate::core::config::AppConfig;
use crate::providers::YahooCurrencyProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Game commands that need a loaded session.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Status,
    Bet { horse: u8, usd: u32 },
    Race { seed: Option<u64> },
    Rate,
    History,
    Delete { id: u64 },
    Clear,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Paddock starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::open(&config)?;
    let rates = Arc::new(YahooCurrencyProvider::from_config(&config.providers)?);
    let mut game = Game::load(&config, store, rates).await?;

    debug!(?command, "Running command");
    match command {
        AppCommand::Status => cli::status::run(&game),
        AppCommand::Bet { horse, usd } => cli::bet::run(&mut game, horse, usd).await,
        AppCommand::Race { seed } => cli::race::run(&mut game, seed).await,
        AppCommand::Rate => cli::rate::run(&mut game).await,
        AppCommand::History => cli::history::run(&game).await,
        AppCommand::Delete { id } => cli::history::delete(&game, id).await,
        AppCommand::Clear => cli::history::clear(&game).await,
    }
}
