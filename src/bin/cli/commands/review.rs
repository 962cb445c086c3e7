use chrono::Utc;

use mneme_lib::scheduler::{format_interval, preview_intervals, Grade};

use crate::app::App;
use crate::OutputFormat;

use super::short_id;

pub fn run(app: &App, card_ref: &str, rating: u8, format: OutputFormat) -> anyhow::Result<()> {
    let grade = Grade::try_from(rating)?;
    let card = app.resolve_card(card_ref)?;
    let now = Utc::now();

    let (next, log) = app
        .storage
        .submit_review(card.id, grade, now, &app.params)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&log)?),
        OutputFormat::Plain => {
            println!(
                "{} graded {:?}: {:?} -> {:?}, next review in {}",
                short_id(&next.id),
                grade,
                log.previous_state,
                log.new_state,
                format_interval(next.due - now),
            );
            println!(
                "stability {:.2}d, difficulty {:.2}, reps {}, lapses {}",
                next.stability, next.difficulty, next.reps, next.lapses
            );
            let preview = preview_intervals(&next, now, &app.params)?;
            println!(
                "next time: Again {} / Hard {} / Good {} / Easy {}",
                preview[0], preview[1], preview[2], preview[3]
            );
        }
    }

    Ok(())
}
