use super::ui;
use crate::core::{BettingRecord, Game};
use anyhow::Result;
use comfy_table::Cell;

pub fn history_table(records: &[BettingRecord]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Time"),
        ui::header_cell("Horse"),
        ui::header_cell("Winner"),
        ui::header_cell("Bet (USD)"),
        ui::header_cell("Bet (TWD)"),
        ui::header_cell("Winnings (TWD)"),
        ui::header_cell("Net (TWD)"),
        ui::header_cell("Balance (TWD)"),
    ]);

    for record in records {
        let time = record
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S");
        let winner = if record.won() {
            Cell::new(format!("#{} ✔", record.winner_horse_number))
        } else {
            Cell::new(format!("#{}", record.winner_horse_number))
        };
        table.add_row(vec![
            ui::number_cell(record.id),
            Cell::new(time),
            Cell::new(format!("#{}", record.horse_number)),
            winner,
            ui::number_cell(record.bet_usd),
            ui::number_cell(record.bet_twd),
            ui::number_cell(record.winnings_twd),
            ui::signed_twd_cell(record.net_twd()),
            ui::number_cell(record.balance_after),
        ]);
    }

    table.to_string()
}

pub async fn run(game: &Game) -> Result<()> {
    let records = game.history().await?;
    if records.is_empty() {
        println!(
            "{}",
            ui::style_text("No bets in the history yet", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let wins = records.iter().filter(|r| r.won()).count();
    let net: i64 = records.iter().map(BettingRecord::net_twd).sum();

    println!("{}\n", ui::style_text("Betting history", ui::StyleType::Title));
    println!("{}", history_table(&records));
    println!(
        "\n{} {} of {} bets won, net {:+} TWD",
        ui::style_text("Summary:", ui::StyleType::TotalLabel),
        wins,
        records.len(),
        net
    );
    Ok(())
}

pub async fn delete(game: &Game, id: u64) -> Result<()> {
    if !game.delete_record(id).await? {
        anyhow::bail!("No betting record with id {}", id);
    }
    println!("Deleted betting record {id}");
    Ok(())
}

pub async fn clear(game: &Game) -> Result<()> {
    let removed = game.clear_history().await?;
    println!("Cleared {removed} betting record(s)");
    Ok(())
}
