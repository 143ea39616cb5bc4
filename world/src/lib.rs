#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Dodle.
//!
//! The world owns the day's [`DailyProgress`] for the duration of a session.
//! Every mutation flows through [`apply`], which commits the history append
//! and the play-state transition together before announcing them as events.

use dodle_core::{Command, DailyProgress, Event, Puzzle, RejectionReason};
use dodle_system_progression::{apply_guess, current_level, reset_if_new_day};

/// Represents the authoritative state of a single play session.
#[derive(Debug)]
pub struct World {
    puzzle: Puzzle,
    stored: Option<DailyProgress>,
    progress: Option<DailyProgress>,
}

impl World {
    /// Creates a world for `puzzle`, seeded with whatever progress was stored previously.
    ///
    /// The stored progress only becomes active once [`Command::StartSession`]
    /// has decided whether it still belongs to the current day.
    #[must_use]
    pub fn new(puzzle: Puzzle, stored: Option<DailyProgress>) -> Self {
        Self {
            puzzle,
            stored,
            progress: None,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession { today } => {
            let previous = world.progress.take().or_else(|| world.stored.take());
            let was_current = previous
                .as_ref()
                .is_some_and(|progress| progress.last_played == today);
            let progress = reset_if_new_day(previous, today);

            if !was_current {
                tracing::debug!(%today, "starting fresh progress for new day");
                out_events.push(Event::ProgressReset { today });
            }
            out_events.push(Event::LevelRevealed {
                level: current_level(&world.puzzle, &progress.history),
            });
            world.progress = Some(progress);
        }
        Command::SubmitGuess { text } => {
            let Some(progress) = world.progress.as_mut() else {
                tracing::warn!("guess submitted before the session was started");
                out_events.push(Event::GuessRejected {
                    reason: RejectionReason::SessionNotStarted,
                });
                return;
            };

            if progress.state.is_terminal() {
                tracing::warn!(state = ?progress.state, "guess submitted after the round ended");
                out_events.push(Event::GuessRejected {
                    reason: RejectionReason::RoundOver {
                        state: progress.state,
                    },
                });
                return;
            }

            let level_before = current_level(&world.puzzle, &progress.history);
            let outcome = apply_guess(&world.puzzle, &progress.history, progress.state, &text);
            let state_changed = outcome.state != progress.state;
            progress.history = outcome.history;
            progress.state = outcome.state;

            if let Some(guess) = progress.history.last() {
                tracing::debug!(
                    attempt = progress.history.len(),
                    correct = guess.is_correct(),
                    "guess recorded"
                );
                out_events.push(Event::GuessRecorded {
                    guess: guess.clone(),
                    attempt: progress.history.len(),
                });
            }
            if state_changed {
                tracing::info!(state = ?progress.state, "round finished");
                out_events.push(Event::PlayStateChanged {
                    state: progress.state,
                });
            }

            let level_after = current_level(&world.puzzle, &progress.history);
            if level_after != level_before {
                out_events.push(Event::LevelRevealed { level: level_after });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dodle_core::{DailyProgress, GuessHistory, ImageLevel, LevelIndex, PlayState, Puzzle};
    use dodle_system_progression::current_level;

    use super::World;

    /// Puzzle the session is played against.
    #[must_use]
    pub fn puzzle(world: &World) -> &Puzzle {
        &world.puzzle
    }

    /// Active progress, available once the session has started.
    #[must_use]
    pub fn progress(world: &World) -> Option<&DailyProgress> {
        world.progress.as_ref()
    }

    /// Guesses submitted during the active session.
    #[must_use]
    pub fn history(world: &World) -> Option<&GuessHistory> {
        world.progress.as_ref().map(|progress| &progress.history)
    }

    /// Lifecycle phase of the active session.
    #[must_use]
    pub fn play_state(world: &World) -> Option<PlayState> {
        world.progress.as_ref().map(|progress| progress.state)
    }

    /// Image level that should currently be displayed.
    #[must_use]
    pub fn current_level_index(world: &World) -> Option<LevelIndex> {
        world
            .progress
            .as_ref()
            .map(|progress| current_level(&world.puzzle, &progress.history))
    }

    /// Image that should currently be displayed.
    ///
    /// When the puzzle skips level numbers, the most revealing image at or
    /// below the current level is used.
    #[must_use]
    pub fn displayed_image(world: &World) -> Option<&ImageLevel> {
        let level = current_level_index(world)?;
        let levels = world.puzzle.levels();
        levels
            .iter()
            .rev()
            .find(|image| image.level <= level)
            .or_else(|| levels.first())
    }
}
