use std::fs;
use std::path::PathBuf;

use super::models::WhitelistEntry;
use crate::error::StorageError;

/// File holding the persisted disconnect-intent flag.
const DISCONNECT_FLAG_FILE: &str = "wallet_disconnected.json";
/// File holding the locally cached whitelist collection.
const WHITELIST_FILE: &str = "whitelist.json";

/// Synchronous key-value persistence under a base directory.
///
/// Only the disconnect-intent flag and the whitelist cache outlive a process;
/// all other session state is volatile. Concurrent processes sharing the same
/// directory race with last-writer-wins.
#[derive(Clone)]
pub struct Storage {
    base_path: PathBuf,
}

impl Storage {
    /// Create a new storage instance with the default base directory ("./data")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
        }
    }

    /// Create storage with custom base directory (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the base directory path for session storage
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Persist the user's explicit disconnect so the next start will not
    /// auto-reconnect.
    pub fn set_disconnect_flag(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string(&true)?;
        fs::write(self.file_path(DISCONNECT_FLAG_FILE), json)?;
        Ok(())
    }

    /// Remove the disconnect-intent flag.
    pub fn clear_disconnect_flag(&self) -> Result<(), StorageError> {
        let path = self.file_path(DISCONNECT_FLAG_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Read the disconnect-intent flag; absent or unreadable counts as unset.
    pub fn disconnect_flag(&self) -> bool {
        let path = self.file_path(DISCONNECT_FLAG_FILE);
        if !path.exists() {
            return false;
        }
        fs::read_to_string(path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or(false)
    }

    /// Load the whitelist collection, or an empty one if none is persisted.
    pub fn load_whitelist(&self) -> Result<Vec<WhitelistEntry>, StorageError> {
        let path = self.file_path(WHITELIST_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path)?;
        let entries = serde_json::from_str(&contents)?;
        Ok(entries)
    }

    /// Write the whole whitelist collection back to disk.
    pub fn save_whitelist(&self, entries: &[WhitelistEntry]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(self.file_path(WHITELIST_FILE), json)?;
        Ok(())
    }

    /// Delete the cached whitelist collection.
    pub fn clear_whitelist(&self) -> Result<(), StorageError> {
        let path = self.file_path(WHITELIST_FILE);
        if path.exists() {
            log::warn!("Clearing cached whitelist: {:?}", path);
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
