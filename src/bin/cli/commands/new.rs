use anyhow::Context;
use chrono::{NaiveDate, Utc};

use mneme_lib::journal::{Card, CardKind};

use crate::app::App;
use crate::OutputFormat;

use super::short_id;

pub fn run(
    app: &App,
    question: Option<String>,
    answer: Option<String>,
    date: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let entry_date = match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", d))?,
        None => now.date_naive(),
    };
    let answer =
        answer.context("entry text required (pass it as an argument or pipe it in)")?;
    let question =
        question.unwrap_or_else(|| format!("What happened on {}?", entry_date));

    let card = Card::new(question, answer, entry_date, CardKind::User, now);
    app.storage.save_card(&card)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!("Created entry {} for {}", short_id(&card.id), card.entry_date);
        }
    }

    Ok(())
}
