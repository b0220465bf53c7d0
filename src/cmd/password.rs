use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use crate::display::display_success;
use crate::router::Page;
use crate::types::auth::ChangePasswordRequest;

use super::{prompt, request_failed, ConfigArgs, RunCommand};

/// Change your password. Values not given as flags are prompted.
#[derive(Args)]
pub struct PasswordArgs {
    #[arg(long)]
    pub current: Option<String>,

    #[arg(long)]
    pub new: Option<String>,

    #[arg(long)]
    pub confirm: Option<String>,
}

#[async_trait]
impl RunCommand for PasswordArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::ChangePassword)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let current = prompt(&self.current, "Current password", true)?;
        let new = prompt(&self.new, "New password", true)?;
        let confirm = prompt(&self.confirm, "Confirm new password", true)?;
        check_new_password(&new, &confirm)?;

        let result = app.client().change_password(&current, &new).await;
        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                return Err(request_failed(&mut app, err, "Failed to change password"));
            }
        };

        display_success(resp.message.as_deref().unwrap_or("Password changed"));
        Ok(())
    }
}

fn check_new_password(new: &str, confirm: &str) -> Result<()> {
    if new != confirm {
        bail!("new passwords do not match");
    }
    if new.chars().count() < ChangePasswordRequest::MIN_PASSWORD_LENGTH {
        bail!(
            "new password must be at least {} characters",
            ChangePasswordRequest::MIN_PASSWORD_LENGTH
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_new_password() {
        assert!(check_new_password("secret1", "secret1").is_ok());
        assert!(check_new_password("secret1", "secret2").is_err());
        assert!(check_new_password("abc", "abc").is_err());
        assert!(check_new_password("abcdef", "abcdef").is_ok());
    }
}
