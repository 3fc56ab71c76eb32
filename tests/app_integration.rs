use paddock::AppCommand;
use paddock::core::Game;
use paddock::core::config::AppConfig;
use paddock::providers::YahooCurrencyProvider;
use paddock::store::disk::DiskStore;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_rate_server(rate: f64) -> MockServer {
        let mock_server = MockServer::start().await;
        let body = format!(r#"{{"chart":{{"result":[{{"meta":{{"regularMarketPrice":{rate}}}}}]}}}}"#);

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/USDTWD=X"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_failing_rate_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        mock_server
    }
}

/// Writes a config for a fast race against `base_url`, storing data in `dir`.
fn write_config(dir: &TempDir, base_url: &str) -> String {
    let config_path = dir.path().join("config.yaml");
    let data_path = dir.path().join("data");
    let config_content = format!(
        r#"
starting_balance: 10000
default_exchange_rate: 30.0
race:
  track_length: 40
  tick_ms: 0
providers:
  yahoo:
    base_url: "{}"
  retries: 0
data_path: "{}"
"#,
        base_url,
        data_path.display()
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_str().unwrap().to_string()
}

async fn open_game(config_path: &str) -> Game {
    let config = AppConfig::load_from_path(config_path).unwrap();
    let store = Arc::new(DiskStore::open(&config.default_data_path().unwrap()).unwrap());
    let rates = Arc::new(YahooCurrencyProvider::from_config(&config.providers).unwrap());
    Game::load(&config, store, rates).await.unwrap()
}

#[test_log::test(tokio::test)]
async fn test_full_betting_round_with_mock_rates() {
    let mock_server = test_utils::create_rate_server(32.5).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri());

    for command in [
        AppCommand::Status,
        AppCommand::Bet { horse: 3, usd: 20 },
        AppCommand::Race { seed: Some(11) },
        AppCommand::History,
    ] {
        info!(?command, "Running");
        let result = paddock::run_command(command, Some(&config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    let game = open_game(&config_path).await;
    let history = game.history().await.unwrap();
    assert_eq!(history.len(), 1);

    let record = &history[0];
    assert_eq!(record.bet_usd, 20);
    // Placed at the default rate, before any fetch
    assert_eq!(record.bet_twd, 600);
    assert_eq!(record.horse_number, 3);
    assert_eq!(record.balance_after, game.balance());
    if record.won() {
        assert_eq!(record.winnings_twd, 1200);
        assert_eq!(game.balance(), 10_600);
    } else {
        assert_eq!(record.winnings_twd, 0);
        assert_eq!(game.balance(), 9_400);
    }

    // Rate refreshed after the race
    assert_eq!(game.exchange_rate(), 32.5);
    assert!(game.pending_bet().is_none());
    let races: u32 = game.horses().iter().map(|h| h.wins).sum();
    assert_eq!(races, 1);
}

#[test_log::test(tokio::test)]
async fn test_rejected_bet_leaves_balance_untouched() {
    let mock_server = test_utils::create_rate_server(30.0).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri());

    // 400 USD at 30.0 is 12000 TWD, more than the 10000 starting balance
    let result =
        paddock::run_command(AppCommand::Bet { horse: 1, usd: 400 }, Some(&config_path)).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Insufficient balance"));

    let game = open_game(&config_path).await;
    assert_eq!(game.balance(), 10_000);
    assert!(game.pending_bet().is_none());
}

#[test_log::test(tokio::test)]
async fn test_race_survives_rate_outage() {
    let mock_server = test_utils::create_failing_rate_server().await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri());

    paddock::run_command(AppCommand::Bet { horse: 2, usd: 10 }, Some(&config_path))
        .await
        .unwrap();
    paddock::run_command(AppCommand::Race { seed: None }, Some(&config_path))
        .await
        .unwrap();

    // An explicit refresh reports the failure
    let result = paddock::run_command(AppCommand::Rate, Some(&config_path)).await;
    assert!(result.is_err());

    let game = open_game(&config_path).await;
    assert_eq!(game.exchange_rate(), 30.0);
    assert_eq!(game.history().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_delete_and_clear_history() {
    let mock_server = test_utils::create_rate_server(30.0).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri());

    for seed in 0..3 {
        paddock::run_command(AppCommand::Bet { horse: 1, usd: 1 }, Some(&config_path))
            .await
            .unwrap();
        paddock::run_command(AppCommand::Race { seed: Some(seed) }, Some(&config_path))
            .await
            .unwrap();
    }

    let ids: Vec<u64> = {
        let game = open_game(&config_path).await;
        game.history().await.unwrap().iter().map(|r| r.id).collect()
    };
    assert_eq!(ids.len(), 3);

    paddock::run_command(AppCommand::Delete { id: ids[0] }, Some(&config_path))
        .await
        .unwrap();
    let missing = paddock::run_command(AppCommand::Delete { id: ids[0] }, Some(&config_path)).await;
    assert!(
        missing
            .unwrap_err()
            .to_string()
            .contains("No betting record with id")
    );

    paddock::run_command(AppCommand::Clear, Some(&config_path))
        .await
        .unwrap();
    let game = open_game(&config_path).await;
    assert!(game.history().await.unwrap().is_empty());
}
