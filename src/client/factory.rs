use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::config::{ClientConfig, CommonConfig, PathSet};
use crate::storage::file::FileStorage;
use crate::store::TokenStore;

use super::Client;

pub struct ClientFactory {
    cfg: ClientConfig,
}

impl ClientFactory {
    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("client", ClientConfig::default)?;
        Ok(Self { cfg })
    }

    pub fn build_token_store(&self) -> Result<TokenStore> {
        let storage = FileStorage::new(Path::new(&self.cfg.storage_path))?;
        Ok(TokenStore::new(Arc::new(storage)))
    }

    pub fn build_client(&self, store: TokenStore) -> Result<Client> {
        Client::new(&self.cfg.server, &self.cfg.cert_path, store)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ps = PathSet::new(
            Some(dir.path().join("config")),
            Some(dir.path().join("data")),
        )
        .unwrap();

        let factory = ClientFactory::load(&ps).unwrap();
        assert_eq!(
            factory.config().storage_path,
            format!("{}", ps.data_path.join("session").display())
        );

        let store = factory.build_token_store().unwrap();
        assert!(store.read_token().is_none());
        assert!(ps.data_path.join("session").is_dir());

        if env::var("EBANK_API_URL").is_err() {
            let client = factory.build_client(store).unwrap();
            assert_eq!(client.url(), "http://localhost:8080");
        }
    }
}
