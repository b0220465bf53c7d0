pub mod file;
pub mod memory;

use anyhow::Result;

/// Persistent string key/value storage that survives process restarts.
///
/// This mirrors the browser's local storage: values are plain strings, a
/// missing key is `None`, and removing a missing key is not an error. All
/// session state goes through this trait so tests can swap in
/// [`memory::MemoryStorage`] instead of touching the filesystem.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;
}
