#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the daily Dodle round.

mod config;
mod terminal;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dodle_catalog::Catalog;
use dodle_core::DateKey;
use dodle_persistence::{FileStore, Session};
use dodle_rendering::{Presentation, RenderingBackend, Scene};
use dodle_system_clock::{Clock, FixedClock, UtcClock};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    config::{Config, DEFAULT_CATALOG_PATH, DEFAULT_STORE_PATH},
    terminal::TerminalBackend,
};

const TITLE: &str = "Dodle";

/// Daily picture-guessing puzzle.
#[derive(Debug, Parser)]
#[command(name = "dodle", version)]
struct Cli {
    /// Config file to read instead of `dodle.toml`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Puzzle catalog to play from.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// File that keeps progress between runs.
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,
    /// Play as if today were this UTC date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<DateKey>,
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Show the current image, guesses and round status.
    Status,
    /// Submit a guess for today's word.
    Guess {
        /// Word to guess.
        word: String,
    },
}

/// Entry point for the Dodle command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(config.log_filter());

    let catalog_path = cli
        .catalog
        .or(config.catalog)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
    let store_path = cli
        .store
        .or(config.store)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

    // One day key for the whole invocation.
    let clock = FixedClock::new(cli.date.unwrap_or_else(|| UtcClock.today()));
    let today = clock.today();
    tracing::debug!(
        %today,
        catalog = %catalog_path.display(),
        store = %store_path.display(),
        "starting session"
    );

    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("could not open catalog {}", catalog_path.display()))?;
    let puzzle = catalog
        .puzzle_for(&today)
        .context("today's puzzle is not available")?
        .clone();

    let (mut session, report) = Session::start(FileStore::new(&store_path), puzzle, &clock);
    for error in &report.storage_errors {
        eprintln!("warning: {error}");
    }
    if !session.is_persisting() {
        eprintln!("warning: progress from this run will not be saved");
    }

    let events = match cli.action.unwrap_or(Action::Status) {
        Action::Status => report.events,
        Action::Guess { word } => {
            let report = session.submit_guess(word);
            for error in &report.storage_errors {
                eprintln!("warning: progress could not be saved: {error}");
            }
            report.events
        }
    };

    let scene = Scene::from_world(session.world(), today, &events)
        .context("session did not produce a scene")?;
    TerminalBackend::new(io::stdout().lock()).present(&Presentation::new(TITLE, scene))
}

fn init_tracing(fallback_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}
