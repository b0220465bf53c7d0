use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dirs::{ensure_dir_exists, home_dir};

pub struct PathSet {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
}

impl PathSet {
    pub fn new(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        // Check if running as root (UID == 0)
        let is_root = unsafe { libc::geteuid() == 0 };

        let config_path = if let Some(path) = config_path {
            path
        } else if let Ok(path) = env::var("EBANK_CONFIG") {
            PathBuf::from(path)
        } else if is_root {
            PathBuf::from("/etc/ebank")
        } else {
            home_dir()?.join(".config").join("ebank")
        };

        let data_path = if let Some(path) = data_path {
            path
        } else if let Ok(path) = env::var("EBANK_DATA") {
            PathBuf::from(path)
        } else if is_root {
            PathBuf::from("/var/lib/ebank")
        } else {
            home_dir()?.join(".local").join("share").join("ebank")
        };

        ensure_dir_exists(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;
        ensure_dir_exists(&data_path)
            .with_context(|| format!("ensure data directory: {}", data_path.display()))?;

        Ok(Self {
            config_path,
            data_path,
        })
    }

    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s).context("parse config toml")?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default = "ClientConfig::default_cert_path")]
    pub cert_path: String,

    /// Directory holding the persisted token and session.
    #[serde(default = "ClientConfig::default_storage_path")]
    pub storage_path: String,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            cert_path: Self::default_cert_path(),
            storage_path: Self::default_storage_path(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if let Ok(server) = env::var("EBANK_API_URL") {
            self.server = server;
        }
        // We won't check server url is valid, the Client::new will check it.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        self.cert_path = expandenv("cert_path", &self.cert_path)?;

        self.storage_path = expandenv("storage_path", &self.storage_path)?;
        if self.storage_path.is_empty() {
            let path = ps.data_path.join("session");
            self.storage_path = format!("{}", path.display());
        }

        Ok(())
    }
}

impl ClientConfig {
    pub fn default_server() -> String {
        String::from("http://localhost:8080")
    }

    pub fn default_cert_path() -> String {
        String::new()
    }

    pub fn default_storage_path() -> String {
        String::new()
    }
}
