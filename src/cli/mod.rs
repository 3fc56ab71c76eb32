//! Terminal front end for the game commands.

pub mod bet;
pub mod history;
pub mod race;
pub mod rate;
pub mod setup;
pub mod status;
pub mod ui;
