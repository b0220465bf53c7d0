use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Ensures that a directory exists at the specified path, creating it and any
/// missing parents if necessary. An existing directory is left untouched.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("'{}' exists but is not a directory", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(path)
            .with_context(|| format!("create directory '{}'", path.display())),
        Err(err) => Err(err).with_context(|| format!("stat directory '{}'", path.display())),
    }
}

pub fn home_dir() -> Result<PathBuf> {
    let dir = std::env::var_os("HOME") // Unix/Linux/macOS
        .or_else(|| std::env::var_os("USERPROFILE")) // Windows
        .map(PathBuf::from);
    match dir {
        Some(dir) => Ok(dir),
        None => bail!("could not determine home directory, please specify path manually"),
    }
}
