//! On-disk home for the hover menu's serialized visual state.
//!
//! The store deals in opaque strings. Producing and interpreting them is the
//! menu's business (see [`crate::menu::HoverMenu::visual_state`]).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR: &str = "term-hover";
const STATE_FILE: &str = "visual_state.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read visual state from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write visual state to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualStateStore {
    path: PathBuf,
}

impl VisualStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_local_dir>/term-hover/visual_state.json`, or the working
    /// directory when the platform has no data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(STATE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved state, or `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, visual_state: &str) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, visual_state).map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), "visual state saved");
        Ok(())
    }

    /// Forget the saved state. Missing files are not an error.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Default for VisualStateStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = VisualStateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_creates_parent_dirs_and_load_reads_back() {
        let dir = TempDir::new().unwrap();
        let store = VisualStateStore::new(dir.path().join("a").join("b").join("state.json"));
        store
            .save(r#"{"anchor_side":0,"normalized_position_y":0.25}"#)
            .unwrap();
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some(r#"{"anchor_side":0,"normalized_position_y":0.25}"#)
        );
    }

    #[test]
    fn clear_removes_state_and_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = VisualStateStore::new(dir.path().join("state.json"));
        store.clear().unwrap();
        store.save("x").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn reading_a_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = VisualStateStore::new(dir.path());
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(err.to_string().contains("failed to read visual state"));
    }

    #[test]
    fn default_path_ends_with_app_file() {
        let path = VisualStateStore::default_path();
        assert!(path.ends_with(Path::new(APP_DIR).join(STATE_FILE)));
    }
}
