use dodle_core::{Command, DailyProgress, Event, Puzzle};
use dodle_system_clock::Clock;
use dodle_world::{apply, query, World};

use crate::{PersistenceGateway, StorageError};

/// Outcome of a session interaction.
#[derive(Debug)]
pub struct SessionReport {
    /// Events broadcast by the world while handling the interaction.
    pub events: Vec<Event>,
    /// Storage failures encountered while loading or saving, in order.
    ///
    /// The in-memory state stays authoritative when this is non-empty.
    pub storage_errors: Vec<StorageError>,
}

/// Play session that keeps a [`World`] and its persistence gateway in step.
#[derive(Debug)]
pub struct Session<G> {
    world: World,
    gateway: G,
    detached: bool,
}

impl<G: PersistenceGateway> Session<G> {
    /// Loads stored progress, discards it if it belongs to another day, and
    /// persists the fresh progress when a reset happened.
    ///
    /// A corrupt store counts as "never played" and is overwritten. When the
    /// store cannot be read at all the session plays in memory and leaves the
    /// store untouched, since it may still hold today's progress.
    pub fn start(gateway: G, puzzle: Puzzle, clock: &impl Clock) -> (Self, SessionReport) {
        let today = clock.today();
        let mut storage_errors = Vec::new();
        let mut detached = false;
        let stored = match gateway.load() {
            Ok(stored) => stored,
            Err(error @ StorageError::Corrupt { .. }) => {
                tracing::warn!(%error, "stored progress is corrupt, starting fresh");
                storage_errors.push(error);
                None
            }
            Err(error) => {
                tracing::warn!(%error, "stored progress unreadable, playing without saving");
                storage_errors.push(error);
                detached = true;
                None
            }
        };

        let mut session = Self {
            world: World::new(puzzle, stored),
            gateway,
            detached,
        };
        let mut events = Vec::new();
        apply(
            &mut session.world,
            Command::StartSession { today },
            &mut events,
        );

        let reset = events
            .iter()
            .any(|event| matches!(event, Event::ProgressReset { .. }));
        if reset {
            storage_errors.extend(session.persist());
        }

        let report = SessionReport {
            events,
            storage_errors,
        };
        (session, report)
    }

    /// Scores a guess and persists the resulting progress.
    pub fn submit_guess(&mut self, text: impl Into<String>) -> SessionReport {
        let mut events = Vec::new();
        apply(
            &mut self.world,
            Command::SubmitGuess { text: text.into() },
            &mut events,
        );

        let recorded = events
            .iter()
            .any(|event| matches!(event, Event::GuessRecorded { .. }));
        let storage_errors = if recorded {
            self.persist().into_iter().collect()
        } else {
            Vec::new()
        };

        SessionReport {
            events,
            storage_errors,
        }
    }

    /// World holding the session state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Progress of the running session.
    #[must_use]
    pub fn progress(&self) -> Option<&DailyProgress> {
        query::progress(&self.world)
    }

    /// Whether progress is written back to the gateway.
    ///
    /// `false` after the store could not be read at start.
    #[must_use]
    pub fn is_persisting(&self) -> bool {
        !self.detached
    }

    /// Gateway the session persists to.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Ends the session and hands back the gateway.
    #[must_use]
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    fn persist(&mut self) -> Option<StorageError> {
        if self.detached {
            tracing::debug!("store unreadable at start, keeping progress in memory");
            return None;
        }
        let progress = query::progress(&self.world)?;
        match self.gateway.save(progress) {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(%error, "failed to persist progress");
                Some(error)
            }
        }
    }
}
