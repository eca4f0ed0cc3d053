//=========================================================================
// Settings Storage
//=========================================================================
//
// Key-value backends for the persisted settings snapshot.
//
// - `MemoryStorage`: in-process map, shareable between clones
// - `FileStorage`: one `<key>.json` file per key under a root directory,
//   written to `<key>.json.tmp` first and renamed over the old file so a
//   crash mid-write never leaves a torn snapshot behind
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

//=== Internal Dependencies ===============================================

use super::SettingsError;

//=== SettingsStorage =====================================================

/// Named string entries that survive between runs.
pub trait SettingsStorage: Send {
    /// Returns the value stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
}

//=== MemoryStorage =======================================================

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates an entry.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.lock().insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

//=== FileStorage =========================================================

/// File-per-key storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Uses `root` as the storage directory. It is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SettingsStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.root)?;

        let final_path = self.path_for(key);
        let tmp_path = final_path.with_extension("json.tmp");

        if let Err(e) = write_then_rename(&tmp_path, &final_path, value.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        trace!(target: "settings", "Wrote {} bytes to {}", value.len(), final_path.display());
        Ok(())
    }
}

//=== Internal Helpers ====================================================

fn write_then_rename(tmp_path: &Path, final_path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(tmp_path, final_path)
}

//=========================================================================
// Tests
//=========================================================================
