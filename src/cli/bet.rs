use super::ui;
use crate::core::Game;
use anyhow::Result;

pub async fn run(game: &mut Game, horse: u8, usd: u32) -> Result<()> {
    let odds = game
        .horses()
        .iter()
        .find(|h| h.id == horse)
        .map(|h| h.odds);
    let bet = game.place_bet(horse, usd).await?;

    println!(
        "Placed {} USD ({} TWD) on horse {}{}",
        bet.usd,
        bet.twd,
        bet.horse,
        odds.map_or(String::new(), |o| format!(" at {}", ui::format_odds(o)))
    );
    println!(
        "{} {} TWD",
        ui::style_text("Balance:", ui::StyleType::TotalLabel),
        game.balance()
    );
    println!(
        "{}",
        ui::style_text("Run `paddock race` to start the race", ui::StyleType::Subtle)
    );
    Ok(())
}
