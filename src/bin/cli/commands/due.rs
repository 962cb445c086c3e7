use chrono::Utc;

use mneme_lib::scheduler::format_interval;
use mneme_lib::session;

use crate::app::App;
use crate::OutputFormat;

use super::short_id;

pub fn run(app: &App, ahead: u32, format: OutputFormat) -> anyhow::Result<()> {
    let now = Utc::now();
    let cards = app.storage.list_cards()?;
    let queue = session::due_and_ahead_entries(&cards, now, ahead);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&queue)?),
        OutputFormat::Plain => {
            if queue.is_empty() {
                println!("No entries due for review.");
                return Ok(());
            }
            let counts = session::state_counts(&queue);
            println!(
                "{} due (new {}, learning {}, review {}, relearning {})",
                queue.len(),
                counts.new,
                counts.learning,
                counts.review,
                counts.relearning,
            );
            for card in &queue {
                let marker = if session::is_ahead_card(card, now, ahead) {
                    " (ahead)"
                } else {
                    ""
                };
                let when = if card.due <= now {
                    "now".to_string()
                } else {
                    format!("in {}", format_interval(card.due - now))
                };
                println!(
                    "{:<10} due {:<8}{}  {}",
                    short_id(&card.id),
                    when,
                    marker,
                    card.prompt_question,
                );
            }
        }
    }

    Ok(())
}
