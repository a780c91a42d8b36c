//! Durable draft state.
//!
//! The session id and draft input text survive process restarts; everything
//! else (loaded panels, analysis, in-flight markers) is ephemeral and
//! rebuilt at session start.

use hokusai_core::SessionId;
use hokusai_error::{HokusaiResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// State persisted between visits of the same client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    /// Session established on a previous visit, if any
    pub session_id: Option<SessionId>,
    /// Unsubmitted narrative text
    pub draft_text: String,
}

impl DraftState {
    /// Default on-disk location, under the platform data directory.
    pub fn default_path() -> HokusaiResult<PathBuf> {
        let dir = dirs::data_dir().ok_or_else(|| StorageError::new(StorageErrorKind::NoDataDir))?;
        Ok(dir.join("hokusai").join("draft.json"))
    }

    /// Load draft state from the given path. A missing file is `None`,
    /// not an error: first visits have no draft.
    pub fn load_from(path: impl AsRef<Path>) -> HokusaiResult<Option<Self>> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::Io(e.to_string())).into());
            }
        };
        let state = serde_json::from_str(&content)
            .map_err(|e| StorageError::new(StorageErrorKind::Corrupt(e.to_string())))?;
        debug!(path = %path.display(), "Loaded draft state");
        Ok(Some(state))
    }

    /// Save draft state to the given path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> HokusaiResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::new(StorageErrorKind::Io(e.to_string())))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::new(StorageErrorKind::Corrupt(e.to_string())))?;
        std::fs::write(path, content)
            .map_err(|e| StorageError::new(StorageErrorKind::Io(e.to_string())))?;
        debug!(path = %path.display(), "Saved draft state");
        Ok(())
    }

    /// Load from the default location.
    pub fn load() -> HokusaiResult<Option<Self>> {
        Self::load_from(Self::default_path()?)
    }

    /// Save to the default location.
    pub fn save(&self) -> HokusaiResult<()> {
        self.save_to(Self::default_path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join("hokusai-draft-tests")
            .join(format!("{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn round_trips_through_disk() {
        let path = scratch_path();
        let state = DraftState {
            session_id: Some(SessionId::new()),
            draft_text: "Kael walked into the neon-lit bar.".to_string(),
        };

        state.save_to(&path).unwrap();
        let loaded = DraftState::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded, state);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_none() {
        assert_eq!(DraftState::load_from(scratch_path()).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        assert!(DraftState::load_from(&path).is_err());

        std::fs::remove_file(&path).ok();
    }
}
