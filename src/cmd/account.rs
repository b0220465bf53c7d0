use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::display::{display_list, display_success};
use crate::router::Page;
use crate::types::account::CreateBankAccountRequest;

use super::{request_failed, ConfigArgs, OutputArgs, RunCommand};

/// Bank account commands, for bank agents
#[derive(Args)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: AccountCommands,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    Create(CreateArgs),
    List(ListArgs),
    Get(GetArgs),
}

#[async_trait]
impl RunCommand for AccountCommand {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        match &self.command {
            AccountCommands::Create(args) => args.run(cfg).await,
            AccountCommands::List(args) => args.run(cfg).await,
            AccountCommands::Get(args) => args.run(cfg).await,
        }
    }
}

/// Open a bank account for an existing customer.
#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub rib: String,

    /// Identity number of the owning customer.
    #[arg(long)]
    pub identity: String,

    /// Initial balance.
    #[arg(long, default_value = "0")]
    pub amount: f64,
}

#[async_trait]
impl RunCommand for CreateArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::AddBankAccount)? {
            Some(app) => app,
            None => return Ok(()),
        };

        if self.rib.is_empty() {
            bail!("rib cannot be empty");
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            bail!("initial amount cannot be negative, found {}", self.amount);
        }

        let req = CreateBankAccountRequest {
            rib: self.rib.clone(),
            identity_number: self.identity.clone(),
            amount: self.amount,
        };

        let result = app.client().create_bank_account(&req).await;
        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                return Err(request_failed(&mut app, err, "Failed to create bank account"));
            }
        };

        display_success(resp.message.as_deref().unwrap_or("Bank account created"));
        Ok(())
    }
}

/// List bank accounts.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

#[async_trait]
impl RunCommand for ListArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::AddBankAccount)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let result = app.client().list_bank_accounts().await;
        let accounts = match result {
            Ok(accounts) => accounts,
            Err(err) => {
                return Err(request_failed(&mut app, err, "Failed to load bank accounts"));
            }
        };
        display_list(accounts, self.output.output, self.output.headless)
    }
}

/// Show one bank account.
#[derive(Args)]
pub struct GetArgs {
    pub rib: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[async_trait]
impl RunCommand for GetArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::AddBankAccount)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let result = app.client().get_bank_account(&self.rib).await;
        let account = match result {
            Ok(account) => account,
            Err(err) => {
                return Err(request_failed(&mut app, err, "Failed to load bank account"));
            }
        };
        display_list(vec![account], self.output.output, self.output.headless)
    }
}
