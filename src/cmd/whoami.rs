use std::collections::BTreeSet;

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use serde::Serialize;

use crate::display::display_json;

use super::{ConfigArgs, RunCommand};

/// Display info of the signed-in user.
#[derive(Args)]
pub struct WhoamiArgs {}

#[derive(Serialize)]
struct Whoami {
    username: String,
    roles: BTreeSet<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,

    authenticated: bool,
}

#[async_trait]
impl RunCommand for WhoamiArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let app = cfg.build_app()?;
        let evaluator = app.evaluator();

        let user = match evaluator.current_user() {
            Some(user) => user,
            None => bail!("not logged in"),
        };

        display_json(Whoami {
            username: user.username,
            roles: user.roles,
            email: user.email,
            authenticated: evaluator.is_authenticated(),
        })
    }
}
