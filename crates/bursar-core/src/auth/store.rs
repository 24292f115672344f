//! Session persistence. One snapshot of the active session survives process
//! restarts; login and refresh overwrite it whole, logout removes it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::models::SessionIdentity;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Persisted form of a session. Field names match what the portal's web
/// client keeps in browser storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "userData")]
    pub user_data: SessionIdentity,
    #[serde(rename = "userType")]
    pub user_type: String,
    #[serde(default)]
    pub department: Option<String>,
}

impl StoredSession {
    /// A snapshot is only worth restoring with both tokens present.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<Mutex<Option<StoredSession>>>),
    Disk(PathBuf),
}

/// Where session snapshots live. The disk backend writes one JSON file in
/// the app data directory; the memory backend backs tests and callers that
/// opt out of persistence.
/// Clones share the same storage.
#[derive(Clone)]
pub struct SessionStore {
    backend: Backend,
}

impl SessionStore {
    /// Store that forgets everything when the last handle drops.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(None))),
        }
    }

    /// Store rooted at the given data directory.
    pub fn open(data_dir: PathBuf) -> Self {
        Self {
            backend: Backend::Disk(data_dir.join(SESSION_FILE)),
        }
    }

    /// Load the persisted snapshot, if any.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        match &self.backend {
            Backend::Memory(slot) => Ok(slot.lock().clone()),
            Backend::Disk(path) => {
                if !path.exists() {
                    return Ok(None);
                }
                let contents =
                    std::fs::read_to_string(path).context("Failed to read session file")?;
                let session: StoredSession =
                    serde_json::from_str(&contents).context("Failed to parse session file")?;
                Ok(Some(session))
            }
        }
    }

    /// Persist a snapshot, replacing whatever was there.
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        match &self.backend {
            Backend::Memory(slot) => {
                *slot.lock() = Some(session.clone());
                Ok(())
            }
            Backend::Disk(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create session directory")?;
                }
                let contents = serde_json::to_string_pretty(session)?;
                std::fs::write(path, contents).context("Failed to write session file")?;
                Ok(())
            }
        }
    }

    /// Remove the persisted snapshot. Absence is not an error.
    pub fn clear(&self) -> Result<()> {
        match &self.backend {
            Backend::Memory(slot) => {
                *slot.lock() = None;
                Ok(())
            }
            Backend::Disk(path) => {
                if path.exists() {
                    std::fs::remove_file(path).context("Failed to remove session file")?;
                }
                Ok(())
            }
        }
    }
}
