#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Puzzle catalog loading for Dodle adapters.
//!
//! Catalogs are authored as TOML with one `[[rounds]]` table per calendar day.
//! Single puzzles can also be read from the JSON payload served by the game
//! API. Every round is validated while loading, so the engine only ever sees
//! well-formed [`Puzzle`] values.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use dodle_core::{DateKey, ImageLevel, LevelIndex, Puzzle, PuzzleError};
use serde::Deserialize;
use thiserror::Error;

/// Collection of puzzles keyed by the day they are played on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    rounds: BTreeMap<DateKey, Puzzle>,
}

impl Catalog {
    /// Reads and validates the TOML catalog stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            rounds = catalog.len(),
            "puzzle catalog loaded"
        );
        Ok(catalog)
    }

    /// Parses and validates a TOML catalog document.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = toml::from_str(contents)?;
        let mut rounds = BTreeMap::new();
        for round in document.rounds {
            let date = round.date;
            let images = round
                .images
                .into_iter()
                .map(|image| ImageLevel::new(LevelIndex::new(image.level), image.locator))
                .collect();
            let puzzle = Puzzle::new(images, round.word, round.prompt)
                .map_err(|source| CatalogError::InvalidRound { date, source })?;
            if rounds.insert(date, puzzle).is_some() {
                return Err(CatalogError::DuplicateRound(date));
            }
        }
        Ok(Self { rounds })
    }

    /// Returns the puzzle scheduled for `today`.
    pub fn puzzle_for(&self, today: &DateKey) -> Result<&Puzzle, CatalogError> {
        self.rounds
            .get(today)
            .ok_or(CatalogError::NoRoundForDate(*today))
    }

    /// Number of scheduled rounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Returns whether no rounds are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Days that have a scheduled round, in calendar order.
    pub fn dates(&self) -> impl Iterator<Item = &DateKey> {
        self.rounds.keys()
    }
}

/// Parses the JSON game payload (`word`, `prompt`, `images[{level, url}]`).
pub fn puzzle_from_game_json(payload: &str) -> Result<Puzzle, CatalogError> {
    let game: GamePayload = serde_json::from_str(payload)?;
    let images = game
        .images
        .into_iter()
        .map(|image| ImageLevel::new(LevelIndex::new(image.level), image.url))
        .collect();
    Puzzle::new(images, game.word, game.prompt).map_err(CatalogError::InvalidGame)
}

/// Errors raised while loading puzzles.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read puzzle catalog at {}", path.display())]
    Io {
        /// Location of the catalog file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The catalog document is not valid TOML for the expected layout.
    #[error("failed to parse puzzle catalog")]
    Toml(#[from] toml::de::Error),
    /// The game payload is not valid JSON for the expected layout.
    #[error("failed to parse game payload")]
    Json(#[from] serde_json::Error),
    /// A scheduled round failed validation.
    #[error("round scheduled for {date} is malformed")]
    InvalidRound {
        /// Day the malformed round is scheduled for.
        date: DateKey,
        /// Validation failure.
        #[source]
        source: PuzzleError,
    },
    /// The game payload failed validation.
    #[error("game payload is malformed")]
    InvalidGame(#[source] PuzzleError),
    /// Two rounds were scheduled for the same day.
    #[error("more than one round is scheduled for {0}")]
    DuplicateRound(DateKey),
    /// No round is scheduled for the requested day.
    #[error("no round is scheduled for {0}")]
    NoRoundForDate(DateKey),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    rounds: Vec<RoundEntry>,
}

#[derive(Debug, Deserialize)]
struct RoundEntry {
    date: DateKey,
    word: String,
    #[serde(default)]
    prompt: String,
    images: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    level: u32,
    locator: String,
}

#[derive(Debug, Deserialize)]
struct GamePayload {
    word: String,
    #[serde(default)]
    prompt: String,
    images: Vec<GameImage>,
}

#[derive(Debug, Deserialize)]
struct GameImage {
    level: u32,
    url: String,
}
