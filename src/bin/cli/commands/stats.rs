use chrono::Utc;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let stats = app.storage.review_stats(Utc::now())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("Entries:     {}", stats.total_cards);
            println!("Due now:     {}", stats.due_cards);
            println!(
                "States:      new {}, learning {}, review {}, relearning {}",
                stats.new_cards, stats.learning_cards, stats.review_cards, stats.relearning_cards
            );
            println!("Day streak:  {}", stats.streak_days);
        }
    }

    Ok(())
}
