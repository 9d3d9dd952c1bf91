use crate::error::StorageError;
use crate::storage::{Storage, WhitelistEntry};

/// Local whitelist cache over the persisted store.
///
/// Writes are read-modify-write on the whole collection; concurrent
/// processes sharing the directory race with last-writer-wins.
#[derive(Clone)]
pub struct WhitelistRegistrar {
    storage: Storage,
}

impl WhitelistRegistrar {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Append the address if absent. Returns whether a new entry was written;
    /// duplicates are skipped, not merged.
    pub fn register(&self, address: &str, tx_hash: Option<String>) -> Result<bool, StorageError> {
        let mut entries = self.storage.load_whitelist()?;
        if entries.iter().any(|entry| entry.address == address) {
            log::debug!("Whitelist already contains {}", address);
            return Ok(false);
        }

        entries.push(WhitelistEntry::new(address, tx_hash));
        self.storage.save_whitelist(&entries)?;
        Ok(true)
    }

    pub fn is_registered(&self, address: &str) -> Result<bool, StorageError> {
        let entries = self.storage.load_whitelist()?;
        Ok(entries.iter().any(|entry| entry.address == address))
    }

    pub fn entries(&self) -> Result<Vec<WhitelistEntry>, StorageError> {
        self.storage.load_whitelist()
    }

    /// Wipe the whole cache. Used by disconnect.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear_whitelist()
    }
}

/// Shape check for a 20-byte hex address ("0x" + 40 hex chars).
pub fn is_hex_address(address: &str) -> bool {
    address.len() == 42 && address.starts_with("0x") && hex::decode(&address[2..]).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registrar() -> (TempDir, WhitelistRegistrar) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        (dir, WhitelistRegistrar::new(storage))
    }

    #[test]
    fn test_register_is_idempotent() {
        let (_dir, registrar) = registrar();

        assert!(registrar.register("0xabc", None).unwrap());
        assert!(!registrar.register("0xabc", None).unwrap());

        let entries = registrar.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].address, "0xabc");
    }

    #[test]
    fn test_is_registered() {
        let (_dir, registrar) = registrar();
        assert!(!registrar.is_registered("0xabc").unwrap());

        registrar.register("0xabc", None).unwrap();
        assert!(registrar.is_registered("0xabc").unwrap());

        registrar.clear().unwrap();
        assert!(!registrar.is_registered("0xabc").unwrap());
    }

    #[test]
    fn test_address_shape_check() {
        assert!(is_hex_address(
            "0x52908400098527886e0f7030069857d2e4169ee7"
        ));
        assert!(!is_hex_address("0x1234"));
        assert!(!is_hex_address(
            "52908400098527886e0f7030069857d2e4169ee700"
        ));
        assert!(!is_hex_address(
            "0xzz908400098527886e0f7030069857d2e4169ee7"
        ));
    }
}
