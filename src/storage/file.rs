use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::dirs::ensure_dir_exists;
use crate::filelock::{read_file_lock, remove_file_lock, write_file_lock};

use super::Storage;

/// Stores every key as its own file under a directory. All processes using
/// the same directory share the items, like browser tabs share local storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path) -> Result<Self> {
        ensure_dir_exists(dir)
            .with_context(|| format!("ensure storage directory '{}'", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            bail!("invalid storage key '{key}'");
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        let data = match read_file_lock(&path)
            .with_context(|| format!("read storage file '{}'", path.display()))?
        {
            Some(data) => data,
            None => return Ok(None),
        };
        let value = String::from_utf8(data)
            .with_context(|| format!("decode storage file '{}' into utf-8", path.display()))?;
        Ok(Some(value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        write_file_lock(&path, value.as_bytes())
            .with_context(|| format!("write storage file '{}'", path.display()))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        remove_file_lock(&path)
            .with_context(|| format!("remove storage file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(&dir.path().join("session")).unwrap();

        assert_eq!(storage.get_item("ebank_auth_token").unwrap(), None);
        storage.set_item("ebank_auth_token", "abc.def.ghi").unwrap();
        assert_eq!(
            storage.get_item("ebank_auth_token").unwrap(),
            Some(String::from("abc.def.ghi"))
        );

        // Shorter value must fully replace the previous one
        storage.set_item("ebank_auth_token", "xyz").unwrap();
        assert_eq!(
            storage.get_item("ebank_auth_token").unwrap(),
            Some(String::from("xyz"))
        );

        storage.remove_item("ebank_auth_token").unwrap();
        assert_eq!(storage.get_item("ebank_auth_token").unwrap(), None);
        storage.remove_item("ebank_auth_token").unwrap();
    }

    #[test]
    fn test_file_storage_shared_directory() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileStorage::new(dir.path()).unwrap();
        let second = FileStorage::new(dir.path()).unwrap();

        first.set_item("ebank_user", "{}").unwrap();
        assert_eq!(second.get_item("ebank_user").unwrap(), Some(String::from("{}")));

        second.remove_item("ebank_user").unwrap();
        assert_eq!(first.get_item("ebank_user").unwrap(), None);
    }

    #[test]
    fn test_file_storage_invalid_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.get_item("../escape").is_err());
        assert!(storage.set_item("", "value").is_err());
        assert!(storage.remove_item(".hidden").is_err());
    }
}
