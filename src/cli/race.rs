use super::status::{describe_bet, odds_table};
use super::ui;
use crate::core::{Game, RaceOutcome};
use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar};

pub fn describe_outcome(outcome: &RaceOutcome) -> String {
    let mut lines = vec![format!(
        "{} Horse {} wins!",
        ui::style_text("🏁", ui::StyleType::Win),
        outcome.result.winner
    )];

    match &outcome.record {
        Some(record) if record.won() => lines.push(format!(
            "Your bet on horse {} paid {} TWD",
            record.horse_number,
            ui::style_text(&record.winnings_twd.to_string(), ui::StyleType::TotalValue)
        )),
        Some(record) => lines.push(format!(
            "Your bet on horse {} lost {} TWD",
            record.horse_number,
            ui::style_text(&record.bet_twd.to_string(), ui::StyleType::Error)
        )),
        None => {}
    }

    lines.push(format!(
        "{} {} TWD",
        ui::style_text("Balance:", ui::StyleType::TotalLabel),
        outcome.balance
    ));

    let rate_note = if outcome.rate_refreshed {
        String::new()
    } else {
        format!(" {}", ui::style_text("(refresh failed, kept previous)", ui::StyleType::Subtle))
    };
    lines.push(format!(
        "{} 1 USD = {:.4} TWD{}",
        ui::style_text("Exchange rate:", ui::StyleType::TotalLabel),
        outcome.exchange_rate,
        rate_note
    ));
    lines.push(ui::style_text(
        &format!("Seed {0} (replay with --seed {0})", outcome.result.seed),
        ui::StyleType::Subtle,
    ));

    lines.join("\n")
}

pub async fn run(game: &mut Game, seed: Option<u64>) -> Result<()> {
    match game.pending_bet() {
        Some(bet) => println!("Racing with {}\n", describe_bet(bet)),
        None => println!(
            "{}\n",
            ui::style_text("No bet placed, racing just for fun", ui::StyleType::Subtle)
        ),
    }

    let multi = MultiProgress::new();
    let track_length = u64::from(game.track_length());
    let lanes: Vec<ProgressBar> = game
        .horses()
        .iter()
        .map(|horse| {
            let lane = multi.add(ui::new_lane_bar(track_length));
            lane.set_prefix(format!("Horse {}", horse.id));
            lane.set_message(ui::format_odds(horse.odds));
            lane
        })
        .collect();

    let outcome = game
        .run_race(seed, |positions| {
            for (lane, position) in lanes.iter().zip(positions) {
                lane.set_position(u64::from(*position));
            }
        })
        .await?;

    for (index, lane) in lanes.iter().enumerate() {
        if index + 1 == usize::from(outcome.result.winner) {
            lane.finish_with_message(ui::style_text("WINNER", ui::StyleType::Win));
        } else {
            lane.abandon();
        }
    }

    println!("\n{}", describe_outcome(&outcome));
    ui::print_separator();
    println!("{}", odds_table(game.horses()));
    Ok(())
}
