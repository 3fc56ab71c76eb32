//! Race simulation.
//!
//! Every horse runs on its own task with its own RNG and posts its position to
//! a single coordinator after each step. The coordinator owns the shared
//! position list, reports every change to the caller and stops the remaining
//! runners as soon as one of them crosses the line.
use crate::core::config::RaceConfig;
use crate::core::horse::HORSE_COUNT;
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RaceResult {
    /// 1-based number of the winning horse.
    pub winner: u8,
    pub positions: Vec<u32>,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy)]
struct Stride {
    horse: usize,
    position: u32,
}

pub struct Race {
    config: RaceConfig,
    positions: Vec<u32>,
}

impl Race {
    pub fn new(config: RaceConfig) -> Self {
        Race {
            config,
            positions: vec![0; HORSE_COUNT],
        }
    }

    pub fn track_length(&self) -> u32 {
        self.config.track_length
    }

    /// Runs one race to completion. `on_progress` is called with the full
    /// position list every time a horse moves. A `seed` makes each horse's
    /// stride sequence reproducible; without one a random seed is drawn.
    ///
    /// Taking `&mut self` means nothing else can touch the race, or the game
    /// that owns it, until this returns.
    #[instrument(name = "Race", skip(self, on_progress))]
    pub async fn run<F>(&mut self, seed: Option<u64>, mut on_progress: F) -> RaceResult
    where
        F: FnMut(&[u32]) + Send,
    {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        self.positions = vec![0; HORSE_COUNT];
        on_progress(&self.positions);
        debug!(seed, "Starting race");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let runners: Vec<JoinHandle<()>> = (0..HORSE_COUNT)
            .map(|horse| {
                let tx = tx.clone();
                let config = self.config.clone();
                let rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(horse as u64));
                tokio::spawn(run_horse(horse, config, rng, tx))
            })
            .collect();
        // Only the runners hold senders now, so the channel closes once they
        // all stop.
        drop(tx);

        let mut winner = None;
        while let Some(stride) = rx.recv().await {
            self.positions[stride.horse] = stride.position;
            on_progress(&self.positions);

            if stride.position >= self.config.track_length {
                winner = Some(stride.horse);
                break;
            }
        }

        for runner in &runners {
            runner.abort();
        }
        join_all(runners).await;

        let winner = match winner {
            Some(index) => index,
            None => self.photo_finish(seed),
        };

        let winner = (winner + 1) as u8;
        info!(winner, positions = ?self.positions, "Race finished");
        RaceResult {
            winner,
            positions: self.positions.clone(),
            seed,
        }
    }

    /// Picks a winner among the leaders when nobody reached the line.
    fn photo_finish(&self, seed: u64) -> usize {
        let lead = self.positions.iter().copied().max().unwrap_or(0);
        let leaders: Vec<usize> = self
            .positions
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == lead)
            .map(|(i, _)| i)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pick = leaders.choose(&mut rng).copied().unwrap_or(0);
        debug!(?leaders, pick, "No horse finished, picking among leaders");
        pick
    }
}

async fn run_horse(
    horse: usize,
    config: RaceConfig,
    mut rng: ChaCha8Rng,
    tx: mpsc::UnboundedSender<Stride>,
) {
    let mut position = 0;
    while position < config.track_length {
        let step = rng.gen_range(1..=config.max_step);
        position = (position + step).min(config.track_length);

        if tx.send(Stride { horse, position }).is_err() {
            // Coordinator is gone, the race is over.
            return;
        }

        if config.tick_ms > 0 {
            tokio::time::sleep(config.tick()).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}
