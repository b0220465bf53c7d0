use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Result;
use file_lock::FileLock;

pub fn read_file_lock(path: &Path) -> Result<Option<Vec<u8>>> {
    let lock_opts = file_lock::FileOptions::new().read(true);
    let mut file = match FileLock::lock(path, true, lock_opts) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut data = Vec::new();
    file.file.read_to_end(&mut data)?;
    Ok(Some(data))
}

pub fn write_file_lock(path: &Path, data: &[u8]) -> Result<()> {
    // Truncate only after the lock is held, opening with truncate would race
    // with readers.
    let lock_opts = file_lock::FileOptions::new().write(true).create(true);
    let mut file = FileLock::lock(path, true, lock_opts)?;
    file.file.set_len(0)?;
    file.file.write_all(data)?;
    Ok(())
}

/// Remove the file while holding its write lock, so a concurrent writer can
/// never leave half of its data behind. A missing file is not an error.
pub fn remove_file_lock(path: &Path) -> Result<()> {
    let lock_opts = file_lock::FileOptions::new().write(true);
    let _file = match FileLock::lock(path, true, lock_opts) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONTENT: &[u8] = b"Bearer token data";
    const ITERATIONS: usize = 50;
    const CONCURRENT_TASKS: usize = 20;

    #[tokio::test]
    async fn test_concurrent_file_operations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ebank_auth_token");

        let tasks: Vec<_> = (0..CONCURRENT_TASKS)
            .map(|_| {
                let path = path.clone();
                tokio::spawn(async move {
                    for _ in 0..ITERATIONS {
                        write_file_lock(&path, TEST_CONTENT)?;
                        let content = read_file_lock(&path)?.expect("File should exist");
                        assert_eq!(content, TEST_CONTENT);
                    }
                    Ok::<_, anyhow::Error>(())
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let final_content = read_file_lock(&path).unwrap().unwrap();
        assert_eq!(final_content, TEST_CONTENT);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file_lock(&dir.path().join("nonexistent_file")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ebank_user");

        write_file_lock(&path, TEST_CONTENT).unwrap();
        remove_file_lock(&path).unwrap();
        assert!(read_file_lock(&path).unwrap().is_none());

        // Already removed
        remove_file_lock(&path).unwrap();
    }
}
