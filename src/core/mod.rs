//! Core game logic and abstractions

pub mod config;
pub mod currency;
pub mod game;
pub mod horse;
pub mod log;
pub mod race;
pub mod record;
pub mod store;

// Re-export main types for cleaner imports
pub use currency::CurrencyRateProvider;
pub use game::{Game, GameState, PendingBet, RaceOutcome};
pub use horse::Horse;
pub use race::{Race, RaceResult};
pub use record::BettingRecord;
pub use store::GameStore;
