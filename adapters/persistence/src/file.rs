use std::{
    fs, io,
    path::{Path, PathBuf},
};

use dodle_core::{DailyProgress, DateKey, GuessHistory, PlayState};
use serde::{Deserialize, Serialize};

use crate::{PersistenceGateway, StorageError};

/// Gateway that stores progress as a JSON document on disk.
///
/// The document holds three keyed records, `guesses`, `playState` and
/// `last_played`, matching the keys the browser client keeps in local
/// storage. A missing file means the player never played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceGateway for FileStore {
    fn load(&self) -> Result<Option<DailyProgress>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(error)),
        };

        let records: StoredRecords =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(records.into_progress())
    }

    fn save(&mut self, progress: &DailyProgress) -> Result<(), StorageError> {
        let records = StoredRecords::from_progress(progress);
        let bytes = serde_json::to_vec_pretty(&records).map_err(StorageError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
            }
        }

        // Staged write; the rename replaces the document in one step.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(|error| self.io_error(error))?;
        fs::rename(&staging, &self.path).map_err(|error| {
            let _ = fs::remove_file(&staging);
            self.io_error(error)
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecords {
    #[serde(default)]
    guesses: GuessHistory,
    #[serde(rename = "playState", default)]
    play_state: PlayState,
    #[serde(default)]
    last_played: Option<DateKey>,
}

impl StoredRecords {
    fn from_progress(progress: &DailyProgress) -> Self {
        Self {
            guesses: progress.history.clone(),
            play_state: progress.state,
            last_played: Some(progress.last_played),
        }
    }

    fn into_progress(self) -> Option<DailyProgress> {
        // Without a date the records cannot be tied to a day.
        let last_played = self.last_played?;
        Some(DailyProgress {
            history: self.guesses,
            state: self.play_state,
            last_played,
        })
    }
}
