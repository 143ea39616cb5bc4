#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Dodle adapters.
//!
//! Adapters build a [`Scene`] from a world snapshot and the events of the
//! last interaction, then hand it to a [`RenderingBackend`].

use anyhow::Result as AnyResult;
use dodle_core::{DateKey, Event, LevelIndex, PlayState, RejectionReason, MAX_ATTEMPTS};
use dodle_world::{query, World};

/// Query parameter appended to image locators so each day bypasses cached images.
pub const DATE_QUERY_PARAMETER: &str = "date";

/// Image the player should currently be looking at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePresentation {
    /// Level of the displayed image.
    pub level: LevelIndex,
    /// Locator of the image, tagged with the day it is shown on.
    pub url: String,
}

/// Single row of the guess list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessPresentation {
    /// One-based attempt number.
    pub attempt: usize,
    /// Text exactly as submitted.
    pub text: String,
    /// Whether the guess named the word.
    pub correct: bool,
}

/// Footer shown beneath the guess list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    /// The round accepts guesses.
    AwaitingGuess {
        /// Guesses left before the round is lost.
        attempts_remaining: usize,
    },
    /// The player guessed the word.
    Solved {
        /// Word that was guessed.
        word: String,
        /// Hint text revealed with the word.
        prompt: String,
        /// Number of guesses the player needed.
        attempts: usize,
    },
    /// The player ran out of guesses.
    Failed {
        /// Word the player was looking for.
        word: String,
        /// Hint text revealed with the word.
        prompt: String,
    },
}

/// Feedback surfaced to adapters about the most recent interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuessFeedback {
    /// The submitted guess named the word.
    Correct,
    /// The submitted guess was wrong.
    Incorrect,
    /// The world ignored the submission.
    Rejected {
        /// Reason the submission was ignored.
        reason: RejectionReason,
    },
}

impl GuessFeedback {
    /// Derives feedback from the events of a single interaction.
    #[must_use]
    pub fn from_events(events: &[Event]) -> Option<Self> {
        events.iter().rev().find_map(|event| match event {
            Event::GuessRecorded { guess, .. } if guess.is_correct() => Some(Self::Correct),
            Event::GuessRecorded { .. } => Some(Self::Incorrect),
            Event::GuessRejected { reason } => Some(Self::Rejected { reason: *reason }),
            _ => None,
        })
    }
}

/// Scene description combining the displayed image, guesses and round status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Image to display.
    pub image: ImagePresentation,
    /// Guesses submitted so far, oldest first.
    pub guesses: Vec<GuessPresentation>,
    /// Footer describing the state of the round.
    pub status: RoundStatus,
    /// Feedback about the last interaction, if any.
    pub feedback: Option<GuessFeedback>,
}

impl Scene {
    /// Builds a scene from a started session.
    ///
    /// Returns `None` until the world has processed a session start.
    #[must_use]
    pub fn from_world(world: &World, today: DateKey, events: &[Event]) -> Option<Self> {
        let progress = query::progress(world)?;
        let image = query::displayed_image(world)?;
        let level = query::current_level_index(world)?;
        let puzzle = query::puzzle(world);

        let guesses = progress
            .history
            .iter()
            .enumerate()
            .map(|(index, guess)| GuessPresentation {
                attempt: index + 1,
                text: guess.text().to_owned(),
                correct: guess.is_correct(),
            })
            .collect();

        let status = match progress.state {
            PlayState::Playing => RoundStatus::AwaitingGuess {
                attempts_remaining: MAX_ATTEMPTS.saturating_sub(progress.history.len()),
            },
            PlayState::Success => RoundStatus::Solved {
                word: puzzle.word().to_owned(),
                prompt: puzzle.prompt().to_owned(),
                attempts: progress.history.len(),
            },
            PlayState::Fail => RoundStatus::Failed {
                word: puzzle.word().to_owned(),
                prompt: puzzle.prompt().to_owned(),
            },
        };

        Some(Self {
            image: ImagePresentation {
                level,
                url: dated_url(&image.locator, today),
            },
            guesses,
            status,
            feedback: GuessFeedback::from_events(events),
        })
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Dodle scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Appends the day's cache-busting parameter to an image locator.
#[must_use]
pub fn dated_url(locator: &str, today: DateKey) -> String {
    let separator = if locator.contains('?') { '&' } else { '?' };
    format!("{locator}{separator}{DATE_QUERY_PARAMETER}={today}")
}
