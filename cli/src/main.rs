mod config;
mod logging;
mod quick;
mod tui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use booking_core::BookingForm;
use clap::Parser;
use tracing::info;

use crate::config::BookingConfig;

#[derive(Parser)]
#[command(name = "booking")]
#[command(about = "Booking invoice calculator", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/booking/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of booking rows on the form
    #[arg(long, global = true)]
    rows: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the Terminal User Interface
    Tui,
    /// Print an invoice without the TUI (usage: quick "cat:voll from:01.03.2024 to:05.03.2024 price:99,5")
    Quick {
        /// Print the invoice as JSON
        #[arg(long)]
        json: bool,
        /// One argument per row, each made of key:value pairs
        #[arg(allow_hyphen_values = true)]
        rows: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let config = BookingConfig::load(cli.config.as_deref())?.with_rows(cli.rows)?;
    info!(rows = config.rows, background = ?config.background, "config loaded");
    let form = BookingForm::new(config.rows, config.background()?);

    match cli.command {
        Some(Commands::Quick { json, rows }) => {
            if !quick::run(form, &rows, json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Tui) | None => {
            tui::run(form, chrono::Local::now().date_naive())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
