//! File-backed session collection.
//!
//! The whole collection lives in one JSON array, most recent first. Every
//! mutation re-reads the file and rewrites it in full, so concurrent writers
//! resolve last-write-wins on the entire collection.

use crate::core::session::{EmotionSession, NewSession};
use crate::store::csv::{samples_to_csv, ExportError};
use chrono::Utc;
use rand::distributions::Uniform;
use rand::Rng;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the session collection inside the data directory.
pub const SESSIONS_FILE: &str = "emotion-sessions.json";

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize sessions: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistent list of recorded sessions.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    sessions: Vec<EmotionSession>,
}

impl SessionStore {
    /// Open the collection at `path`. A missing file is an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let sessions = read_collection(&path)?;
        tracing::debug!(path = %path.display(), sessions = sessions.len(), "session store opened");
        Ok(Self { path, sessions })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the collection from disk.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.sessions = read_collection(&self.path)?;
        Ok(())
    }

    /// Assign an id and prepend the session.
    pub fn save(&mut self, session: NewSession) -> Result<EmotionSession, StoreError> {
        self.reload()?;

        let session = session.with_id(generate_session_id());
        self.sessions.insert(0, session.clone());
        self.persist()?;

        tracing::info!(
            id = %session.id,
            samples = session.sample_count(),
            "session saved"
        );
        Ok(session)
    }

    /// All sessions, most recent first.
    pub fn list(&self) -> &[EmotionSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&EmotionSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Render the samples of session `id` as CSV.
    pub fn export_csv(&self, id: &str) -> Result<String, ExportError> {
        let session = self
            .get(id)
            .ok_or_else(|| ExportError::UnknownSession(id.to_string()))?;
        samples_to_csv(&session.emotion_data)
    }

    /// Remove the session with `id`. Returns `false` when it was not present.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.reload()?;

        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return Ok(false);
        }

        self.persist()?;
        tracing::info!(id, "session deleted");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Write the collection through a temp file in the same directory.
    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string(&self.sessions)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// Read the collection. Malformed content is logged and treated as empty.
fn read_collection(path: &Path) -> Result<Vec<EmotionSession>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&content) {
        Ok(sessions) => Ok(sessions),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "session collection is corrupt, starting empty: {e}"
            );
            Ok(Vec::new())
        }
    }
}

/// `session-<ms epoch>-<9 base36 chars>`.
fn generate_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(Uniform::from(0..BASE36.len()))
        .take(ID_SUFFIX_LEN)
        .map(|i| BASE36[i] as char)
        .collect();
    format!("session-{}-{}", Utc::now().timestamp_millis(), suffix)
}
