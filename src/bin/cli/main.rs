mod app;
mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mneme-cli", about = "Memory journal CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a journal entry
    New {
        /// Entry text (use "-" to read from stdin)
        answer: Option<String>,
        /// Review prompt (defaults to "What happened on <date>?")
        #[arg(long)]
        question: Option<String>,
        /// Entry date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List all entries, newest first
    List,

    /// Show the review queue
    Due {
        /// Also pull in cards scheduled within the next N days
        #[arg(long, default_value = "0")]
        ahead: u32,
    },

    /// Grade a card: 1 Again, 2 Hard, 3 Good, 4 Easy
    Review {
        /// Card id (prefix match)
        card: String,
        /// Rating 1-4
        rating: u8,
    },

    /// Card-count histograms for planning a session
    Counts {
        /// Review-ahead window to summarize
        #[arg(long, default_value = "0")]
        ahead: u32,
        /// Forgotten-card lookback to summarize
        #[arg(long, default_value = "0")]
        forgotten: u32,
        /// Histogram length in days
        #[arg(long, default_value = "30")]
        max_days: u32,
    },

    /// Journal statistics and day streak
    Stats,
}

/// Read content from stdin if piped, or resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Option<String> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf.trim_end().to_string())
        }
        Some(_) => content,
        None => {
            if !stdin_is_tty() {
                let mut buf = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
                let trimmed = buf.trim_end();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            } else {
                None
            }
        }
    }
}

/// Check if stdin is a terminal (not piped)
fn stdin_is_tty() -> bool {
    unsafe { libc_isatty(0) != 0 }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::New { answer, question, date } => {
            let answer = resolve_content(answer);
            commands::new::run(&app, question, answer, date, cli.format)?;
        }
        Command::List => {
            commands::list::run(&app, cli.format)?;
        }
        Command::Due { ahead } => {
            commands::due::run(&app, ahead, cli.format)?;
        }
        Command::Review { card, rating } => {
            commands::review::run(&app, &card, rating, cli.format)?;
        }
        Command::Counts { ahead, forgotten, max_days } => {
            commands::counts::run(&app, ahead, forgotten, max_days, cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, cli.format)?;
        }
    }

    Ok(())
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
