use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::display::{display_list, display_success};
use crate::router::Page;
use crate::types::customer::CreateCustomerRequest;
use crate::types::date::start_of_day_utc;

use super::{request_failed, ConfigArgs, OutputArgs, RunCommand};

/// Customer commands, for bank agents
#[derive(Args)]
pub struct CustomerCommand {
    #[command(subcommand)]
    pub command: CustomerCommands,
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    Create(CreateArgs),
    List(ListArgs),
}

#[async_trait]
impl RunCommand for CustomerCommand {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        match &self.command {
            CustomerCommands::Create(args) => args.run(cfg).await,
            CustomerCommands::List(args) => args.run(cfg).await,
        }
    }
}

/// Register a new customer.
#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub firstname: String,

    #[arg(long)]
    pub lastname: String,

    /// National identity number, used later to attach bank accounts.
    #[arg(long)]
    pub identity: String,

    /// Format: YYYY-MM-DD.
    #[arg(long)]
    pub birth_date: NaiveDate,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub address: String,
}

#[async_trait]
impl RunCommand for CreateArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::AddClient)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let req = CreateCustomerRequest {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            identity_number: self.identity.clone(),
            birth_date: start_of_day_utc(self.birth_date),
            email: self.email.clone(),
            postal_address: self.address.clone(),
        };

        let result = app.client().create_customer(&req).await;
        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                return Err(request_failed(&mut app, err, "Failed to create customer"));
            }
        };

        display_success(resp.message.as_deref().unwrap_or("Customer created"));
        Ok(())
    }
}

/// List registered customers.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

#[async_trait]
impl RunCommand for ListArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::AddClient)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let result = app.client().list_customers().await;
        let customers = match result {
            Ok(customers) => customers,
            Err(err) => {
                return Err(request_failed(&mut app, err, "Failed to load customers"));
            }
        };
        display_list(customers, self.output.output, self.output.headless)
    }
}
