use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use console::style;

use crate::client::Client;
use crate::display::{display_json, display_list, DisplayStyle};
use crate::router::Page;

use super::{request_failed, ConfigArgs, OutputArgs, RunCommand};

/// Show your accounts and the recent transactions of one of them.
#[derive(Args)]
pub struct DashboardArgs {
    /// The account to show transactions for, the server picks one when omitted.
    #[arg(long)]
    pub rib: Option<String>,

    /// Page of transactions, starting at 0.
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Transactions per page.
    #[arg(long, default_value_t = Client::DASHBOARD_PAGE_SIZE)]
    pub size: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[async_trait]
impl RunCommand for DashboardArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = match cfg.open_page(Page::Dashboard)? {
            Some(app) => app,
            None => return Ok(()),
        };

        let result = app
            .client()
            .dashboard(self.rib.as_deref(), self.page, self.size)
            .await;
        let dashboard = match result {
            Ok(dashboard) => dashboard,
            Err(err) => return Err(request_failed(&mut app, err, "Failed to load dashboard")),
        };

        let OutputArgs { output, headless } = self.output;
        if let DisplayStyle::Json = output {
            return display_json(dashboard);
        }

        println!("{}", style("Accounts").bold());
        display_list(dashboard.accounts, output, headless)?;

        println!();
        match dashboard.selected_rib {
            Some(ref rib) => {
                let balance = dashboard.selected_account_balance.unwrap_or_default();
                println!("{} {rib} (balance {balance:.2})", style("Transactions of").bold());
            }
            None => println!("{}", style("Transactions").bold()),
        }
        display_list(dashboard.recent_transactions, output, headless)?;

        if dashboard.total_pages > 0 {
            println!(
                "Page {}/{}, {} transactions in total",
                self.page + 1,
                dashboard.total_pages,
                dashboard.total_transactions
            );
        }
        Ok(())
    }
}
