#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence boundary for daily progress.
//!
//! The engine never touches storage directly. Adapters implement
//! [`PersistenceGateway`], and [`Session`] drives the load, reset, guess and
//! save cycle around the world. Storage failures are reported to the caller
//! but never undo a decision the world already made.

use std::{io, path::PathBuf};

use dodle_core::DailyProgress;
use thiserror::Error;

mod file;
mod session;

pub use file::FileStore;
pub use session::{Session, SessionReport};

/// Storage contract consumed by [`Session`].
pub trait PersistenceGateway {
    /// Loads the most recently saved progress, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<DailyProgress>, StorageError>;

    /// Replaces the stored progress with `progress`.
    fn save(&mut self, progress: &DailyProgress) -> Result<(), StorageError>;
}

/// Failures raised by persistence gateways.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("failed to access progress store at {}", path.display())]
    Io {
        /// Location of the backing file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The stored records could not be decoded.
    #[error("progress store at {} is corrupt", path.display())]
    Corrupt {
        /// Location of the backing file.
        path: PathBuf,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The progress could not be encoded for storage.
    #[error("failed to encode progress")]
    Encode(#[source] serde_json::Error),
}

/// Gateway that keeps progress in memory for the lifetime of the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    progress: Option<DailyProgress>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            progress: None,
            saves: 0,
        }
    }

    /// Creates a store pre-populated with `progress`.
    #[must_use]
    pub const fn with_progress(progress: DailyProgress) -> Self {
        Self {
            progress: Some(progress),
            saves: 0,
        }
    }

    /// Progress currently held by the store.
    #[must_use]
    pub fn progress(&self) -> Option<&DailyProgress> {
        self.progress.as_ref()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl PersistenceGateway for MemoryStore {
    fn load(&self) -> Result<Option<DailyProgress>, StorageError> {
        Ok(self.progress.clone())
    }

    fn save(&mut self, progress: &DailyProgress) -> Result<(), StorageError> {
        self.progress = Some(progress.clone());
        self.saves += 1;
        Ok(())
    }
}
