use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};

use super::Storage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = match self.items.lock() {
            Ok(items) => items,
            Err(_) => bail!("memory storage lock poisoned"),
        };
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = match self.items.lock() {
            Ok(items) => items,
            Err(_) => bail!("memory storage lock poisoned"),
        };
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = match self.items.lock() {
            Ok(items) => items,
            Err(_) => bail!("memory storage lock poisoned"),
        };
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("key").unwrap(), None);

        storage.set_item("key", "value").unwrap();
        assert_eq!(storage.get_item("key").unwrap(), Some(String::from("value")));

        storage.set_item("key", "other").unwrap();
        assert_eq!(storage.get_item("key").unwrap(), Some(String::from("other")));

        storage.remove_item("key").unwrap();
        assert_eq!(storage.get_item("key").unwrap(), None);

        // Removing twice is fine
        storage.remove_item("key").unwrap();
    }
}
