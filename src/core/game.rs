//! The game session: wallet, odds board, pending bet and race settlement.
//!
//! A [`Game`] is loaded from a [`GameStore`] for every command and saved back
//! after anything that changes it, so a session carries over between runs of
//! the binary.
use crate::core::config::{AppConfig, RaceConfig};
use crate::core::currency::{CurrencyRateProvider, TWD, USD};
use crate::core::horse::{HORSE_COUNT, Horse};
use crate::core::race::{Race, RaceResult};
use crate::core::record::BettingRecord;
use crate::core::store::GameStore;
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A bet waiting for the next race. The TWD amount has already been taken
/// from the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingBet {
    pub horse: u8,
    pub usd: u32,
    pub twd: i64,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Wallet balance in TWD.
    pub balance: i64,
    /// TWD per USD.
    pub exchange_rate: f64,
    pub rate_updated_at: Option<DateTime<Utc>>,
    pub horses: Vec<Horse>,
    pub pending_bet: Option<PendingBet>,
}

impl GameState {
    pub fn new(balance: i64, exchange_rate: f64) -> Self {
        GameState {
            balance,
            exchange_rate,
            rate_updated_at: None,
            horses: Horse::field(),
            pending_bet: None,
        }
    }

    /// Whole TWD for a USD stake at the current rate, truncated.
    pub fn usd_to_twd(&self, usd: u32) -> i64 {
        (f64::from(usd) * self.exchange_rate) as i64
    }
}

/// Everything that happened in one race, for display.
#[derive(Debug, Clone)]
pub struct RaceOutcome {
    pub result: RaceResult,
    /// The settled bet, if one was placed.
    pub record: Option<BettingRecord>,
    pub balance: i64,
    pub exchange_rate: f64,
    /// False when the post-race rate refresh failed and the old rate was kept.
    pub rate_refreshed: bool,
}

pub struct Game {
    state: GameState,
    race: Race,
    store: Arc<dyn GameStore>,
    rates: Arc<dyn CurrencyRateProvider>,
}

impl Game {
    pub fn new(
        state: GameState,
        race_config: RaceConfig,
        store: Arc<dyn GameStore>,
        rates: Arc<dyn CurrencyRateProvider>,
    ) -> Self {
        Game {
            state,
            race: Race::new(race_config),
            store,
            rates,
        }
    }

    /// Resumes the saved session, or starts a fresh one from `config`.
    pub async fn load(
        config: &AppConfig,
        store: Arc<dyn GameStore>,
        rates: Arc<dyn CurrencyRateProvider>,
    ) -> Result<Self> {
        let mut state = match store.load_state().await? {
            Some(state) if state.horses.len() == HORSE_COUNT => state,
            Some(_) => {
                warn!("Saved game has an unexpected field of horses, starting over");
                GameState::new(config.starting_balance, config.default_exchange_rate)
            }
            None => {
                info!(balance = config.starting_balance, "Starting a new game");
                GameState::new(config.starting_balance, config.default_exchange_rate)
            }
        };

        // A bet on a horse outside the field can never settle.
        if let Some(bet) = state.pending_bet.take() {
            if state.horses.iter().any(|h| h.id == bet.horse) {
                state.pending_bet = Some(bet);
            } else {
                warn!(
                    horse = bet.horse,
                    twd = bet.twd,
                    "Saved bet names no horse in the field, refunding"
                );
                state.balance += bet.twd;
            }
        }
        Ok(Self::new(state, config.race.clone(), store, rates))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn balance(&self) -> i64 {
        self.state.balance
    }

    pub fn exchange_rate(&self) -> f64 {
        self.state.exchange_rate
    }

    pub fn horses(&self) -> &[Horse] {
        &self.state.horses
    }

    pub fn pending_bet(&self) -> Option<&PendingBet> {
        self.state.pending_bet.as_ref()
    }

    pub fn track_length(&self) -> u32 {
        self.race.track_length()
    }

    /// Fetches the current USD/TWD rate and keeps it. On failure the previous
    /// rate stays in place and the error is returned.
    pub async fn refresh_exchange_rate(&mut self) -> Result<f64> {
        let rate = self.rates.get_rate(USD, TWD).await?;
        if rate.is_nan() || rate <= 0.0 {
            bail!("Received an unusable exchange rate: {}", rate);
        }
        info!(rate, "Fetched exchange rate");
        let mut state = self.state.clone();
        state.exchange_rate = rate;
        state.rate_updated_at = Some(Utc::now());
        self.store.save_state(&state).await?;
        self.state = state;
        Ok(rate)
    }

    /// Stakes `usd` on horse number `horse` (1-based). The TWD equivalent at
    /// the current rate is taken from the balance right away.
    pub async fn place_bet(&mut self, horse: u8, usd: u32) -> Result<PendingBet> {
        if usd == 0 {
            bail!("Bet amount must be greater than zero");
        }
        if horse == 0 || usize::from(horse) > HORSE_COUNT {
            bail!("No horse number {}, pick 1 to {}", horse, HORSE_COUNT);
        }
        if let Some(existing) = &self.state.pending_bet {
            bail!(
                "A bet of {} USD on horse {} is already waiting for the next race",
                existing.usd,
                existing.horse
            );
        }
        let twd = self.state.usd_to_twd(usd);
        if twd > self.state.balance {
            bail!(
                "Insufficient balance: bet needs {} TWD but only {} TWD is available",
                twd,
                self.state.balance
            );
        }

        let bet = PendingBet {
            horse,
            usd,
            twd,
            placed_at: Utc::now(),
        };
        self.state.balance -= twd;
        self.state.pending_bet = Some(bet.clone());
        self.store.save_state(&self.state).await?;
        info!(horse, usd, twd, balance = self.state.balance, "Bet placed");
        Ok(bet)
    }

    /// Runs a race, settles the pending bet (if any), adjusts the odds, logs
    /// the bet to history and refreshes the exchange rate.
    pub async fn run_race<F>(&mut self, seed: Option<u64>, on_progress: F) -> Result<RaceOutcome>
    where
        F: FnMut(&[u32]) + Send,
    {
        for horse in &mut self.state.horses {
            horse.position = 0;
        }

        let result = self.race.run(seed, on_progress).await;
        for (horse, position) in self.state.horses.iter_mut().zip(&result.positions) {
            horse.position = *position;
        }

        let record = self.settle(result.winner).await?;

        // A failed refresh never undoes the race.
        let rate_refreshed = match self.refresh_exchange_rate().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Could not refresh exchange rate, keeping previous");
                false
            }
        };

        Ok(RaceOutcome {
            result,
            record,
            balance: self.state.balance,
            exchange_rate: self.state.exchange_rate,
            rate_refreshed,
        })
    }

    /// Pays out and records the pending bet and moves the odds. The new state
    /// and the record reach the store in one commit; on failure the game is
    /// left as it was, bet still pending.
    async fn settle(&mut self, winner: u8) -> Result<Option<BettingRecord>> {
        let mut state = self.state.clone();
        let bet = state.pending_bet.take();

        // Winnings use the odds the bet was placed against.
        let winnings = match &bet {
            Some(bet) => {
                let Some(horse) = state.horses.iter().find(|h| h.id == bet.horse) else {
                    bail!("Pending bet is on horse {}, which is not in the field", bet.horse);
                };
                if bet.horse == winner {
                    (bet.twd as f64 * horse.odds) as i64
                } else {
                    0
                }
            }
            None => 0,
        };
        state.balance += winnings;

        for horse in &mut state.horses {
            horse.record_result(horse.id == winner);
        }
        let odds: Vec<f64> = state.horses.iter().map(|h| h.odds).collect();
        debug!(winner, ?odds, "Odds updated");

        let record = bet.map(|bet| BettingRecord {
            id: 0,
            bet_usd: bet.usd,
            bet_twd: bet.twd,
            horse_number: bet.horse,
            winner_horse_number: winner,
            winnings_twd: winnings,
            balance_after: state.balance,
            timestamp: Utc::now(),
        });
        let stored = self.store.commit_settlement(&state, record).await?;
        if let Some(record) = &stored {
            info!(id = record.id, winnings, balance = state.balance, "Bet settled");
        }
        self.state = state;

        Ok(stored)
    }

    pub async fn history(&self) -> Result<Vec<BettingRecord>> {
        self.store.records().await
    }

    pub async fn delete_record(&self, id: u64) -> Result<bool> {
        self.store.delete_record(id).await
    }

    pub async fn clear_history(&self) -> Result<usize> {
        self.store.clear_records().await
    }
}
