use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

impl Default for YahooProviderConfig {
    fn default() -> Self {
        YahooProviderConfig {
            base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProvidersConfig {
    pub yahoo: YahooProviderConfig,
    /// Extra attempts after a failed rate request.
    pub retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: YahooProviderConfig::default(),
            retries: 2,
            retry_delay_ms: 500,
        }
    }
}

/// Shape and pace of a race.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RaceConfig {
    pub track_length: u32,
    pub tick_ms: u64,
    /// Largest distance a horse can cover in one tick. Every tick moves a
    /// horse by at least one.
    pub max_step: u32,
}

impl RaceConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            track_length: 100,
            tick_ms: 100,
            max_step: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Wallet balance in TWD for a fresh game.
    pub starting_balance: i64,
    /// TWD per USD used until the first successful fetch.
    pub default_exchange_rate: f64,
    pub race: RaceConfig,
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            starting_balance: 10_000,
            default_exchange_rate: 30.0,
            race: RaceConfig::default(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "paddock", "paddock")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "paddock", "paddock")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.starting_balance < 0 {
            anyhow::bail!("starting_balance must not be negative");
        }
        if self.default_exchange_rate.is_nan() || self.default_exchange_rate <= 0.0 {
            anyhow::bail!("default_exchange_rate must be positive");
        }
        if self.race.track_length == 0 {
            anyhow::bail!("race.track_length must be at least 1");
        }
        if self.race.max_step == 0 {
            anyhow::bail!("race.max_step must be at least 1");
        }
        Ok(())
    }
}
