use crate::app::App;
use crate::OutputFormat;

use super::short_id;

pub fn run(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let cards = app.storage.list_cards()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No entries yet. Add one with 'mneme-cli new'.");
                return Ok(());
            }
            println!(
                "{:<10} {:<12} {:<11} {:>5} {:>6}  {}",
                "ID", "DATE", "STATE", "REPS", "LAPSES", "QUESTION"
            );
            for card in &cards {
                println!(
                    "{:<10} {:<12} {:<11} {:>5} {:>6}  {}",
                    short_id(&card.id),
                    card.entry_date.to_string(),
                    format!("{:?}", card.state),
                    card.reps,
                    card.lapses,
                    card.prompt_question,
                );
            }
        }
    }

    Ok(())
}
