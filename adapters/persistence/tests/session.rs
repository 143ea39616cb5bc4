use std::io;

use dodle_core::{
    DailyProgress, DateKey, Event, Guess, GuessHistory, ImageLevel, LevelIndex, PlayState, Puzzle,
    RejectionReason,
};
use dodle_persistence::{FileStore, MemoryStore, PersistenceGateway, Session, StorageError};
use dodle_system_clock::FixedClock;
use dodle_world::query;

fn puzzle() -> Puzzle {
    let images = (1..=5)
        .map(|level| ImageLevel::new(LevelIndex::new(level), format!("{level}.png")))
        .collect();
    Puzzle::new(images, "cat", "Purrs on your keyboard").expect("valid puzzle")
}

fn clock(value: &str) -> FixedClock {
    FixedClock::new(key(value))
}

fn key(value: &str) -> DateKey {
    DateKey::parse(value).expect("valid key")
}

fn interrupted() -> StorageError {
    StorageError::Io {
        path: "progress.json".into(),
        source: io::Error::new(io::ErrorKind::Interrupted, "interrupted"),
    }
}

/// Gateway whose reads fail while it still holds a stored document.
#[derive(Debug)]
struct UnreadableStore {
    progress: DailyProgress,
    attempted_saves: usize,
}

impl PersistenceGateway for UnreadableStore {
    fn load(&self) -> Result<Option<DailyProgress>, StorageError> {
        Err(interrupted())
    }

    fn save(&mut self, progress: &DailyProgress) -> Result<(), StorageError> {
        self.attempted_saves += 1;
        self.progress = progress.clone();
        Ok(())
    }
}

/// Gateway whose reads yield a corrupt document and whose writes fail.
#[derive(Debug, Default)]
struct CorruptReadOnlyStore;

impl PersistenceGateway for CorruptReadOnlyStore {
    fn load(&self) -> Result<Option<DailyProgress>, StorageError> {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        Err(StorageError::Corrupt {
            path: "progress.json".into(),
            source,
        })
    }

    fn save(&mut self, _progress: &DailyProgress) -> Result<(), StorageError> {
        Err(interrupted())
    }
}

/// Gateway whose writes always fail, optionally serving stored progress.
#[derive(Debug, Default)]
struct ReadOnlyStore {
    progress: Option<DailyProgress>,
    attempted_saves: usize,
}

impl PersistenceGateway for ReadOnlyStore {
    fn load(&self) -> Result<Option<DailyProgress>, StorageError> {
        Ok(self.progress.clone())
    }

    fn save(&mut self, _progress: &DailyProgress) -> Result<(), StorageError> {
        self.attempted_saves += 1;
        Err(StorageError::Io {
            path: "read-only.json".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[test]
fn first_visit_persists_fresh_progress() {
    let (session, report) = Session::start(MemoryStore::new(), puzzle(), &clock("2024-01-02"));

    assert!(report.storage_errors.is_empty());
    assert!(report.events.contains(&Event::ProgressReset {
        today: key("2024-01-02")
    }));
    assert_eq!(
        session.gateway().progress(),
        Some(&DailyProgress::fresh(key("2024-01-02")))
    );
}

#[test]
fn same_day_visit_does_not_rewrite_progress() {
    let stored = DailyProgress {
        history: GuessHistory::new().appended(Guess::new("dog", false)),
        state: PlayState::Playing,
        last_played: key("2024-01-02"),
    };
    let (session, report) = Session::start(
        MemoryStore::with_progress(stored.clone()),
        puzzle(),
        &clock("2024-01-02"),
    );

    assert!(report.storage_errors.is_empty());
    assert_eq!(session.gateway().saves(), 0);
    assert_eq!(session.progress(), Some(&stored));
}

#[test]
fn next_day_visit_discards_finished_round() {
    let stored = DailyProgress {
        history: GuessHistory::new().appended(Guess::new("cat", true)),
        state: PlayState::Success,
        last_played: key("2024-01-01"),
    };
    let (session, _) = Session::start(
        MemoryStore::with_progress(stored),
        puzzle(),
        &clock("2024-01-02"),
    );

    assert_eq!(
        session.gateway().progress(),
        Some(&DailyProgress::fresh(key("2024-01-02")))
    );
}

#[test]
fn each_guess_is_persisted() {
    let (mut session, _) = Session::start(MemoryStore::new(), puzzle(), &clock("2024-01-02"));

    let report = session.submit_guess("dog");
    assert!(report.storage_errors.is_empty());
    let report = session.submit_guess("CAT");
    assert!(report.storage_errors.is_empty());

    let stored = session.gateway().progress().expect("progress saved");
    assert_eq!(stored.history.len(), 2);
    assert_eq!(stored.state, PlayState::Success);
    assert_eq!(session.gateway().saves(), 3);
}

#[test]
fn rejected_guess_is_not_persisted() {
    let stored = DailyProgress {
        history: GuessHistory::new().appended(Guess::new("cat", true)),
        state: PlayState::Success,
        last_played: key("2024-01-02"),
    };
    let (mut session, _) = Session::start(
        MemoryStore::with_progress(stored),
        puzzle(),
        &clock("2024-01-02"),
    );

    let report = session.submit_guess("dog");

    assert_eq!(
        report.events,
        vec![Event::GuessRejected {
            reason: RejectionReason::RoundOver {
                state: PlayState::Success
            }
        }]
    );
    assert_eq!(session.gateway().saves(), 0);
}

#[test]
fn save_failures_do_not_undo_gameplay() {
    let (mut session, report) =
        Session::start(ReadOnlyStore::default(), puzzle(), &clock("2024-01-02"));
    assert!(matches!(
        report.storage_errors.as_slice(),
        [StorageError::Io { .. }]
    ));

    let report = session.submit_guess("dog");

    assert!(matches!(
        report.storage_errors.as_slice(),
        [StorageError::Io { .. }]
    ));
    assert_eq!(query::play_state(session.world()), Some(PlayState::Playing));
    assert_eq!(
        query::current_level_index(session.world()),
        Some(LevelIndex::new(2))
    );
    assert_eq!(session.gateway().attempted_saves, 2);
}

#[test]
fn corrupt_store_starts_fresh_and_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("progress.json");
    std::fs::write(&path, "{").expect("write");

    let (session, report) = Session::start(FileStore::new(&path), puzzle(), &clock("2024-01-02"));

    assert!(matches!(
        report.storage_errors.as_slice(),
        [StorageError::Corrupt { .. }]
    ));
    assert_eq!(
        session.progress(),
        Some(&DailyProgress::fresh(key("2024-01-02")))
    );
    // The fresh day overwrote the corrupt document.
    assert_eq!(
        session.gateway().load().expect("readable again"),
        Some(DailyProgress::fresh(key("2024-01-02")))
    );
}

#[test]
fn file_store_resumes_across_sessions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("progress.json");

    let (mut session, _) = Session::start(FileStore::new(&path), puzzle(), &clock("2024-01-02"));
    let _ = session.submit_guess("dog");
    let _ = session.submit_guess("bird");
    drop(session.into_gateway());

    let (session, report) = Session::start(FileStore::new(&path), puzzle(), &clock("2024-01-02"));

    assert!(!report
        .events
        .iter()
        .any(|event| matches!(event, Event::ProgressReset { .. })));
    assert_eq!(
        query::current_level_index(session.world()),
        Some(LevelIndex::new(3))
    );
}

#[test]
fn unreadable_store_is_never_overwritten() {
    let failed_round = DailyProgress {
        history: (0..5).map(|_| Guess::new("dog", false)).collect(),
        state: PlayState::Fail,
        last_played: key("2024-01-02"),
    };
    let store = UnreadableStore {
        progress: failed_round.clone(),
        attempted_saves: 0,
    };

    let (mut session, report) = Session::start(store, puzzle(), &clock("2024-01-02"));

    assert!(matches!(
        report.storage_errors.as_slice(),
        [StorageError::Io { .. }]
    ));
    assert!(!session.is_persisting());
    assert_eq!(session.gateway().attempted_saves, 0);

    let report = session.submit_guess("cat");

    assert!(report.storage_errors.is_empty());
    assert_eq!(query::play_state(session.world()), Some(PlayState::Success));
    let store = session.into_gateway();
    assert_eq!(store.attempted_saves, 0);
    assert_eq!(store.progress, failed_round);
}

#[test]
fn load_and_save_failures_are_both_reported() {
    let (session, report) = Session::start(CorruptReadOnlyStore, puzzle(), &clock("2024-01-02"));

    assert!(session.is_persisting());
    assert!(matches!(
        report.storage_errors.as_slice(),
        [StorageError::Corrupt { .. }, StorageError::Io { .. }]
    ));
}
