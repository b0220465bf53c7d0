use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::display::display_success;
use crate::router::LOGIN_PATH;

use super::{show_view, ConfigArgs, RunCommand};

/// Drop the local session.
#[derive(Args)]
pub struct LogoutArgs {}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = cfg.build_app()?;
        app.client().logout()?;
        display_success("Logged out");

        let view = app.open(LOGIN_PATH)?;
        show_view(&app, view);
        Ok(())
    }
}
