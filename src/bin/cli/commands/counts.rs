use chrono::Utc;
use serde::Serialize;

use mneme_lib::session::{self, DayCount, SessionCounts};

use crate::app::App;
use crate::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CountsReport {
    session: SessionCounts,
    by_day: Vec<DayCount>,
    forgotten_by_day: Vec<DayCount>,
}

pub fn run(
    app: &App,
    ahead: u32,
    forgotten: u32,
    max_days: u32,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let cards = app.storage.list_cards()?;

    let report = CountsReport {
        session: session::session_card_count(&cards, now, ahead, forgotten),
        by_day: session::card_counts_by_day(&cards, now, max_days),
        forgotten_by_day: session::forgotten_card_counts(&cards, now, max_days),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            println!(
                "Session ({} ahead, {} forgotten lookback): {} cards ({} regular, {} forgotten)",
                ahead,
                forgotten,
                report.session.total_cards,
                report.session.regular_cards,
                report.session.forgotten_cards,
            );
            println!("\nReview ahead:");
            for dc in &report.by_day {
                println!("  +{:<3} days  {:>4} cards", dc.days, dc.count);
            }
            println!("\nForgotten in the last:");
            for dc in &report.forgotten_by_day {
                println!("  {:<4} days  {:>4} cards", dc.days, dc.count);
            }
        }
    }

    Ok(())
}
