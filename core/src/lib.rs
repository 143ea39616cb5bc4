#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dodle engine.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative session world, and pure systems. Adapters
//! submit [`Command`] values describing a player interaction, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what changed. Systems never perform I/O; they
//! receive values and return new ones.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of guesses a player may submit before the round is lost.
pub const MAX_ATTEMPTS: usize = 5;

/// Format used for canonical calendar-day keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Commands that express all permissible progress mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Opens a play session for the provided calendar day, discarding stale progress.
    StartSession {
        /// Calendar day the session belongs to.
        today: DateKey,
    },
    /// Submits a raw guess typed by the player.
    SubmitGuess {
        /// Text exactly as entered by the player.
        text: String,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that previously stored progress was superseded by a fresh day.
    ProgressReset {
        /// Calendar day the fresh progress belongs to.
        today: DateKey,
    },
    /// Confirms that a guess was scored and appended to the history.
    GuessRecorded {
        /// Scored guess that was appended.
        guess: Guess,
        /// One-based attempt number of the guess within the day.
        attempt: usize,
    },
    /// Announces that the round entered a new play state.
    PlayStateChanged {
        /// State that became active after processing the command.
        state: PlayState,
    },
    /// Announces that a different image level should now be displayed.
    LevelRevealed {
        /// Level that became visible.
        level: LevelIndex,
    },
    /// Reports that a command was ignored because it is not valid in the current state.
    GuessRejected {
        /// Specific reason the guess was ignored.
        reason: RejectionReason,
    },
}

/// Reasons a guess submission may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// No session was started, so there is no progress to extend.
    SessionNotStarted,
    /// The round already ended, so further guesses cannot be scored.
    RoundOver {
        /// Terminal state the round ended in.
        state: PlayState,
    },
}

/// Lifecycle phase of the daily round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    /// The player may still submit guesses.
    #[default]
    Playing,
    /// The player guessed the word.
    Success,
    /// The player exhausted every attempt without guessing the word.
    Fail,
}

impl PlayState {
    /// Returns whether the state ends the round for the day.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }
}

/// One-based index of an image within the reveal sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelIndex(u32);

impl LevelIndex {
    /// Creates a new level index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying level number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LevelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single image in the ordered reveal sequence of a puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageLevel {
    /// Position of the image within the reveal sequence.
    pub level: LevelIndex,
    /// Opaque locator the presentation layer uses to fetch the image.
    pub locator: String,
}

impl ImageLevel {
    /// Creates a new image level descriptor.
    #[must_use]
    pub fn new(level: LevelIndex, locator: impl Into<String>) -> Self {
        Self {
            level,
            locator: locator.into(),
        }
    }
}

/// Read-only description of a single day's puzzle.
///
/// Construction validates the level sequence, so every `Puzzle` in circulation
/// has at least one level and strictly increasing level indices starting at one
/// or above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    levels: Vec<ImageLevel>,
    word: String,
    prompt: String,
}

impl Puzzle {
    /// Validates and creates a new puzzle description.
    pub fn new(
        levels: Vec<ImageLevel>,
        word: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Result<Self, PuzzleError> {
        if levels.is_empty() {
            return Err(PuzzleError::NoLevels);
        }

        let mut previous: Option<LevelIndex> = None;
        for image in &levels {
            if image.level.get() == 0 {
                return Err(PuzzleError::ZeroLevel);
            }
            if let Some(previous) = previous {
                if image.level <= previous {
                    return Err(PuzzleError::LevelsOutOfOrder {
                        previous,
                        next: image.level,
                    });
                }
            }
            previous = Some(image.level);
        }

        Ok(Self {
            levels,
            word: word.into(),
            prompt: prompt.into(),
        })
    }

    /// Images in reveal order.
    #[must_use]
    pub fn levels(&self) -> &[ImageLevel] {
        &self.levels
    }

    /// Word the player is trying to guess.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Hint text shown alongside the end-of-round message.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Level index of the final, most revealing image.
    #[must_use]
    pub fn last_level(&self) -> LevelIndex {
        // Non-empty by construction.
        self.levels
            .last()
            .map_or(LevelIndex::new(1), |image| image.level)
    }

    /// Looks up the image registered for the provided level.
    #[must_use]
    pub fn image(&self, level: LevelIndex) -> Option<&ImageLevel> {
        self.levels.iter().find(|image| image.level == level)
    }
}

/// Configuration errors detected while building a [`Puzzle`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// The puzzle did not list any images.
    #[error("puzzle must contain at least one image level")]
    NoLevels,
    /// An image used level index zero.
    #[error("image levels are numbered from 1")]
    ZeroLevel,
    /// Image levels were not listed in strictly increasing order.
    #[error("image level {next} does not follow level {previous}")]
    LevelsOutOfOrder {
        /// Level listed before the offending entry.
        previous: LevelIndex,
        /// Offending level.
        next: LevelIndex,
    },
}

/// A single scored player submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guess {
    #[serde(rename = "word")]
    text: String,
    correct: bool,
}

impl Guess {
    /// Creates a scored guess.
    #[must_use]
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }

    /// Text exactly as submitted by the player.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the guess matched the puzzle word.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.correct
    }
}

/// Chronologically ordered, append-only sequence of guesses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuessHistory(Vec<Guess>);

impl GuessHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns a new history with `guess` appended, leaving `self` untouched.
    #[must_use]
    pub fn appended(&self, guess: Guess) -> Self {
        let mut guesses = Vec::with_capacity(self.0.len() + 1);
        guesses.extend_from_slice(&self.0);
        guesses.push(guess);
        Self(guesses)
    }

    /// Number of guesses submitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no guesses were submitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent guess, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Guess> {
        self.0.last()
    }

    /// Guesses in submission order.
    #[must_use]
    pub fn as_slice(&self) -> &[Guess] {
        &self.0
    }

    /// Iterates over guesses in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Guess> {
        self.0.iter()
    }
}

impl FromIterator<Guess> for GuessHistory {
    fn from_iter<I: IntoIterator<Item = Guess>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GuessHistory {
    type Item = &'a Guess;
    type IntoIter = std::slice::Iter<'a, Guess>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Canonical calendar-day identifier rendered as an ISO date (`YYYY-MM-DD`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a key from its canonical `YYYY-MM-DD` form.
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| DateKeyError(value.to_owned()))
    }

    /// Calendar date represented by the key.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

/// Error returned when a string is not a canonical date key.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a calendar date in YYYY-MM-DD form")]
pub struct DateKeyError(String);

/// Progress of the player through a single day's round.
///
/// This is the only mutable aggregate that outlives a session: it is created
/// at the first interaction of a day, replaced by each accepted guess, and
/// superseded wholesale when the day changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Guesses submitted during the day.
    pub history: GuessHistory,
    /// Current lifecycle phase of the round.
    pub state: PlayState,
    /// Calendar day the progress belongs to.
    pub last_played: DateKey,
}

impl DailyProgress {
    /// Creates the start-of-day progress for the provided calendar day.
    #[must_use]
    pub const fn fresh(today: DateKey) -> Self {
        Self {
            history: GuessHistory::new(),
            state: PlayState::Playing,
            last_played: today,
        }
    }
}
