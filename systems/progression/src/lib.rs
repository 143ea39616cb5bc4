#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure progression rules for the daily round.
//!
//! The functions in this crate decide which image is shown, how a guess
//! changes the round, and when stored progress belongs to a previous day.
//! They never perform I/O; callers own the read-modify-write cycle around
//! [`DailyProgress`].

use dodle_core::{
    DailyProgress, DateKey, Guess, GuessHistory, LevelIndex, PlayState, Puzzle, MAX_ATTEMPTS,
};
use dodle_system_evaluator::evaluate;

/// History and state produced by submitting a guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    /// History after the submission.
    pub history: GuessHistory,
    /// Play state after the submission.
    pub state: PlayState,
}

/// Computes the image level to display for the provided history.
///
/// After a correct guess that was not made on the final image, the display
/// stays on the level the word was solved on instead of advancing.
#[must_use]
pub fn current_level(puzzle: &Puzzle, history: &GuessHistory) -> LevelIndex {
    let last_level = puzzle.last_level().get();
    let guesses = u32::try_from(history.len()).unwrap_or(u32::MAX);

    let solved = history.last().is_some_and(Guess::is_correct);
    if solved && guesses < last_level {
        return LevelIndex::new(guesses);
    }

    if guesses >= last_level {
        return LevelIndex::new(last_level);
    }

    LevelIndex::new(guesses + 1)
}

/// Scores `raw_input` and derives the history and state that follow it.
///
/// Submissions are only accepted while the round is [`PlayState::Playing`];
/// otherwise the inputs are returned unchanged.
#[must_use]
pub fn apply_guess(
    puzzle: &Puzzle,
    history: &GuessHistory,
    state: PlayState,
    raw_input: &str,
) -> GuessOutcome {
    if state != PlayState::Playing {
        return GuessOutcome {
            history: history.clone(),
            state,
        };
    }

    let correct = evaluate(raw_input, puzzle.word());
    let history = history.appended(Guess::new(raw_input, correct));

    let state = if correct {
        PlayState::Success
    } else if history.len() >= MAX_ATTEMPTS {
        PlayState::Fail
    } else {
        PlayState::Playing
    };

    GuessOutcome { history, state }
}

/// Discards progress that does not belong to `today`.
///
/// Absent progress is treated as a previous day, and progress dated after
/// `today` (clock moved backwards) is discarded as well. This is the only way a round
/// returns to [`PlayState::Playing`] after ending.
#[must_use]
pub fn reset_if_new_day(progress: Option<DailyProgress>, today: DateKey) -> DailyProgress {
    match progress {
        Some(progress) if progress.last_played == today => progress,
        _ => DailyProgress::fresh(today),
    }
}
