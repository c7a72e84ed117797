use super::state::BanditSnapshot;
use anyhow::Result;
use atsp_utils::{read_json_file, write_json_file};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Persistence collaborator of the bandit selector: one load at session start, one
/// save at session end.
pub trait BanditStore: Send + Sync {
    fn load(&self) -> Result<BanditSnapshot>;
    fn save(&self, snapshot: &BanditSnapshot) -> Result<()>;
}

/// Keeps the last saved snapshot in memory.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<BanditSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: BanditSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    pub fn saved(&self) -> Option<BanditSnapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BanditStore for MemoryStore {
    fn load(&self) -> Result<BanditSnapshot> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, snapshot: &BanditSnapshot) -> Result<()> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}

/// JSON document on disk. A missing file loads as empty state.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BanditStore for JsonFileStore {
    fn load(&self) -> Result<BanditSnapshot> {
        if !self.path.exists() {
            return Ok(BanditSnapshot::default());
        }
        read_json_file(&self.path)
    }

    fn save(&self, snapshot: &BanditSnapshot) -> Result<()> {
        write_json_file(&self.path, snapshot)
    }
}
