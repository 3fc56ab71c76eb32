use super::ui;
use crate::core::{Game, Horse, PendingBet};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use comfy_table::Cell;

/// Renders the odds board: one row per horse.
pub fn odds_table(horses: &[Horse]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Horse"),
        ui::header_cell("Odds"),
        ui::header_cell("Wins"),
        ui::header_cell("Losses"),
        ui::header_cell("Win rate"),
    ]);

    for horse in horses {
        let races = horse.wins + horse.losses;
        let win_rate = if races == 0 {
            "N/A".to_string()
        } else {
            format!("{:.0}%", f64::from(horse.wins) / f64::from(races) * 100.0)
        };
        table.add_row(vec![
            Cell::new(format!("#{}", horse.id)),
            ui::odds_cell(horse.odds),
            ui::number_cell(horse.wins),
            ui::number_cell(horse.losses),
            ui::number_cell(win_rate),
        ]);
    }

    table.to_string()
}

pub fn describe_bet(bet: &PendingBet) -> String {
    format!("{} USD ({} TWD) on horse {}", bet.usd, bet.twd, bet.horse)
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// The bet with the time it was placed, for the status view.
pub fn describe_pending_bet(bet: &PendingBet) -> String {
    format!("{}, placed {}", describe_bet(bet), local_time(bet.placed_at))
}

pub fn run(game: &Game) -> Result<()> {
    let state = game.state();

    println!("{}\n", ui::style_text("Paddock", ui::StyleType::Title));
    println!(
        "{} {}",
        ui::style_text("Balance:", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{} TWD", state.balance), ui::StyleType::TotalValue)
    );

    let updated = state.rate_updated_at.map_or_else(
        || "default, not fetched yet".to_string(),
        |at| format!("updated {}", local_time(at)),
    );
    println!(
        "{} 1 USD = {:.4} TWD {}",
        ui::style_text("Exchange rate:", ui::StyleType::TotalLabel),
        state.exchange_rate,
        ui::style_text(&format!("({updated})"), ui::StyleType::Subtle)
    );

    match &state.pending_bet {
        Some(bet) => println!(
            "{} {}",
            ui::style_text("Pending bet:", ui::StyleType::TotalLabel),
            describe_pending_bet(bet)
        ),
        None => println!(
            "{}",
            ui::style_text("No bet placed for the next race", ui::StyleType::Subtle)
        ),
    }

    println!("\n{}", odds_table(game.horses()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_odds_table_lists_every_horse() {
        let mut horses = Horse::field();
        horses[1].record_result(true);
        horses[0].record_result(false);

        let table = odds_table(&horses);
        for id in 1..=4 {
            assert!(table.contains(&format!("#{id}")));
        }
        assert!(table.contains("1.90x"));
        assert!(table.contains("2.10x"));
        assert!(table.contains("100%"));
        assert!(table.contains("N/A"));
    }

    #[test]
    fn test_describe_bet() {
        let bet = PendingBet {
            horse: 3,
            usd: 20,
            twd: 640,
            placed_at: chrono::Utc::now(),
        };
        assert_eq!(describe_bet(&bet), "20 USD (640 TWD) on horse 3");
    }

    #[test]
    fn test_describe_pending_bet_shows_placement_time() {
        let placed_at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap();
        let bet = PendingBet {
            horse: 1,
            usd: 5,
            twd: 150,
            placed_at,
        };
        let local = placed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        assert_eq!(
            describe_pending_bet(&bet),
            format!("5 USD (150 TWD) on horse 1, placed {local}")
        );
    }
}
