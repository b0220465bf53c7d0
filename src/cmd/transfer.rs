use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use log::info;

use crate::client::{Client, RequestError};
use crate::display::display_success;
use crate::router::Page;
use crate::types::transfer::TransferRequest;

use super::{request_failed, ConfigArgs, RunCommand};

/// Move money from one of your accounts to another account.
#[derive(Args)]
pub struct TransferArgs {
    /// RIB of the account to debit. Defaults to your first account.
    #[arg(long)]
    pub from: Option<String>,

    /// RIB of the account to credit.
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub amount: f64,

    #[arg(long, default_value = "")]
    pub motif: String,
}

#[async_trait]
impl RunCommand for TransferArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::Transfer)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let result = source_rib(app.client(), self.from.as_deref()).await;
        let source_rib = match result {
            Ok(Some(rib)) => rib,
            Ok(None) => bail!("You have no bank account to transfer from"),
            Err(err) => return Err(request_failed(&mut app, err, "Failed to load accounts")),
        };

        let req = TransferRequest {
            source_rib,
            destination_rib: self.to.clone(),
            amount: self.amount,
            motif: self.motif.clone(),
        };
        req.validate()?;

        let result = app.client().transfer(&req).await;
        let resp = match result {
            Ok(resp) => resp,
            Err(err) => return Err(request_failed(&mut app, err, "Transfer failed")),
        };
        if !resp.success {
            bail!(
                "{}",
                resp.message.as_deref().unwrap_or("Transfer was rejected")
            );
        }

        display_success(resp.message.as_deref().unwrap_or("Transfer done"));
        if let (Some(debit), Some(credit)) = (resp.debit_transaction_id, resp.credit_transaction_id) {
            println!("Debit transaction: {debit}, credit transaction: {credit}");
        }
        Ok(())
    }
}

/// The account to debit: the one given, or else the first account listed on
/// the dashboard. `None` when the user has no account.
async fn source_rib(client: &Client, from: Option<&str>) -> Result<Option<String>, RequestError> {
    if let Some(rib) = from {
        return Ok(Some(rib.to_string()));
    }

    let dashboard = client
        .dashboard(None, 0, Client::DASHBOARD_PAGE_SIZE)
        .await?;
    let rib = dashboard.accounts.into_iter().next().map(|account| account.rib);
    if let Some(ref rib) = rib {
        info!("No source account given, using '{rib}'");
    }
    Ok(rib)
}
