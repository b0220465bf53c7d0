use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::client::factory::ClientFactory;
use crate::display::display_json;

use super::{ConfigArgs, RunCommand};

/// Display the configuration information used in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let ps = cfg.build_path_set()?;

        let factory = ClientFactory::load(&ps)?;
        display_json(factory.config())
    }
}
