use super::ui;
use crate::core::Game;
use anyhow::Result;

pub async fn run(game: &mut Game) -> Result<()> {
    let previous = game.exchange_rate();
    let spinner = ui::new_spinner("Fetching USD/TWD rate...");
    let result = game.refresh_exchange_rate().await;
    spinner.finish_and_clear();

    let rate = result?;
    println!(
        "{} 1 USD = {:.4} TWD {}",
        ui::style_text("Exchange rate:", ui::StyleType::TotalLabel),
        rate,
        ui::style_text(&format!("(was {previous:.4})"), ui::StyleType::Subtle)
    );
    Ok(())
}
