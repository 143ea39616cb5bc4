use dodle_core::{
    DailyProgress, DateKey, Guess, GuessHistory, ImageLevel, LevelIndex, PlayState, Puzzle,
    MAX_ATTEMPTS,
};
use dodle_system_progression::{apply_guess, current_level, reset_if_new_day, GuessOutcome};

fn five_level_cat_puzzle() -> Puzzle {
    let images = (1..=5)
        .map(|level| ImageLevel::new(LevelIndex::new(level), format!("/api/image?level={level}")))
        .collect();
    Puzzle::new(images, "cat", "Purrs on your keyboard").expect("valid puzzle")
}

fn wrong_guesses(count: usize) -> GuessHistory {
    (0..count).map(|_| Guess::new("dog", false)).collect()
}

fn key(value: &str) -> DateKey {
    DateKey::parse(value).expect("valid date key")
}

#[test]
fn empty_history_shows_first_level() {
    let puzzle = five_level_cat_puzzle();
    assert_eq!(
        current_level(&puzzle, &GuessHistory::new()),
        LevelIndex::new(1)
    );
}

#[test]
fn long_histories_clamp_to_last_level() {
    let puzzle = five_level_cat_puzzle();
    for count in 5..9 {
        assert_eq!(
            current_level(&puzzle, &wrong_guesses(count)),
            puzzle.last_level(),
            "history of {count} guesses must clamp",
        );
    }
}

#[test]
fn correct_guess_keeps_solved_level_on_screen() {
    let puzzle = five_level_cat_puzzle();
    for wrong in 0..4 {
        let history = wrong_guesses(wrong).appended(Guess::new("cat", true));
        let expected = u32::try_from(history.len()).expect("small history");
        assert_eq!(
            current_level(&puzzle, &history),
            LevelIndex::new(expected),
            "solving on attempt {} must not advance the reveal",
            history.len(),
        );
    }
}

#[test]
fn apply_guess_appends_exactly_one_entry() {
    let puzzle = five_level_cat_puzzle();
    let history = wrong_guesses(2);
    let before = history.clone();

    let outcome = apply_guess(&puzzle, &history, PlayState::Playing, "bird");

    assert_eq!(history, before, "input history must not be mutated");
    assert_eq!(outcome.history.len(), history.len() + 1);
    assert_eq!(&outcome.history.as_slice()[..history.len()], history.as_slice());
    assert_eq!(outcome.history.last(), Some(&Guess::new("bird", false)));
}

#[test]
fn empty_guess_is_a_legal_wrong_guess() {
    let puzzle = five_level_cat_puzzle();
    let outcome = apply_guess(&puzzle, &GuessHistory::new(), PlayState::Playing, "");
    assert_eq!(outcome.history.last(), Some(&Guess::new("", false)));
    assert_eq!(outcome.state, PlayState::Playing);
}

#[test]
fn terminal_states_ignore_further_guesses() {
    let puzzle = five_level_cat_puzzle();
    let history = wrong_guesses(MAX_ATTEMPTS);

    for state in [PlayState::Success, PlayState::Fail] {
        let outcome = apply_guess(&puzzle, &history, state, "cat");
        assert_eq!(
            outcome,
            GuessOutcome {
                history: history.clone(),
                state,
            },
            "{state:?} must be terminal",
        );
    }
}

#[test]
fn reset_is_idempotent_for_the_same_day() {
    let stale = DailyProgress {
        history: wrong_guesses(3),
        state: PlayState::Fail,
        last_played: key("2023-12-31"),
    };
    let today = key("2024-01-01");

    let once = reset_if_new_day(Some(stale), today);
    let twice = reset_if_new_day(Some(once.clone()), today);
    assert_eq!(once, twice);
}

#[test]
fn scenario_first_wrong_guess_reveals_second_level() {
    let puzzle = five_level_cat_puzzle();
    assert_eq!(
        current_level(&puzzle, &GuessHistory::new()),
        LevelIndex::new(1)
    );

    let outcome = apply_guess(&puzzle, &GuessHistory::new(), PlayState::Playing, "dog");

    assert!(!outcome.history.as_slice()[0].is_correct());
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(outcome.state, PlayState::Playing);
    assert_eq!(current_level(&puzzle, &outcome.history), LevelIndex::new(2));
}

#[test]
fn scenario_fifth_wrong_guess_fails_the_round() {
    let puzzle = five_level_cat_puzzle();
    let mut history = GuessHistory::new();
    let mut state = PlayState::Playing;

    for attempt in 1..=MAX_ATTEMPTS {
        let outcome = apply_guess(&puzzle, &history, state, "dog");
        history = outcome.history;
        state = outcome.state;

        if attempt < MAX_ATTEMPTS {
            assert_eq!(state, PlayState::Playing, "attempt {attempt} keeps playing");
        }
    }

    assert_eq!(history.len(), MAX_ATTEMPTS);
    assert_eq!(state, PlayState::Fail);
    assert_eq!(current_level(&puzzle, &history), puzzle.last_level());
}

#[test]
fn scenario_upper_case_guess_wins() {
    let puzzle = five_level_cat_puzzle();
    let outcome = apply_guess(&puzzle, &GuessHistory::new(), PlayState::Playing, "CAT");

    assert!(outcome.history.as_slice()[0].is_correct());
    assert_eq!(outcome.history.as_slice()[0].text(), "CAT");
    assert_eq!(outcome.state, PlayState::Success);
    assert_eq!(outcome.history.len(), 1);
}

#[test]
fn scenario_new_day_discards_previous_progress() {
    let stored = DailyProgress {
        history: wrong_guesses(2).appended(Guess::new("cat", true)),
        state: PlayState::Success,
        last_played: key("2024-01-01"),
    };

    let progress = reset_if_new_day(Some(stored), key("2024-01-02"));

    assert!(progress.history.is_empty());
    assert_eq!(progress.state, PlayState::Playing);
    assert_eq!(progress.last_played, key("2024-01-02"));
}

#[test]
fn scenario_guess_after_success_is_ignored() {
    let puzzle = five_level_cat_puzzle();
    let won = apply_guess(&puzzle, &GuessHistory::new(), PlayState::Playing, "cat");
    assert_eq!(won.state, PlayState::Success);

    let after = apply_guess(&puzzle, &won.history, won.state, "dog");

    assert_eq!(after.history, won.history);
    assert_eq!(after.state, PlayState::Success);
}
