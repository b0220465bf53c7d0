use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use log::info;

use crate::display::{display_notice, display_success};
use crate::router::{Page, View, LOGIN_PATH};

use super::{prompt, request_failed, show_view, ConfigArgs, RunCommand};

/// Sign in and open the home page of your role.
#[derive(Args)]
pub struct LoginArgs {
    /// The username, prompted when omitted.
    pub username: Option<String>,

    /// The password, prompted when omitted.
    #[arg(long, short)]
    pub password: Option<String>,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = cfg.build_app()?;

        let view = app.open(LOGIN_PATH)?;
        if view != View::Content(Page::Login) {
            if let Some(user) = app.evaluator().current_user() {
                display_notice(&format!(
                    "Already logged in as '{}', run `ebank logout` first to switch user",
                    user.username
                ));
            }
            show_view(&app, view);
            return Ok(());
        }

        let username = prompt(&self.username, "Username", false)?;
        let password = prompt(&self.password, "Password", true)?;
        if username.is_empty() || password.is_empty() {
            bail!("username and password are required");
        }

        info!("Login to {} as '{username}'", app.client().url());
        let result = app.client().login(&username, &password).await;
        let resp = match result {
            Ok(resp) => resp,
            Err(err) => return Err(request_failed(&mut app, err, "Login failed")),
        };
        if resp.token.is_empty() {
            bail!("Login failed: the server did not return a token");
        }

        display_success(&format!("Welcome, {}", resp.username));
        let view = app.open_landing()?;
        show_view(&app, view);
        Ok(())
    }
}
