mod account;
mod config;
mod customer;
mod dashboard;
mod login;
mod logout;
mod open;
mod password;
mod transfer;
mod whoami;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use console::Term;
use log::debug;

use crate::app::App;
use crate::client::factory::ClientFactory;
use crate::client::RequestError;
use crate::config::PathSet;
use crate::display::{display_notice, display_view, DisplayStyle};
use crate::router::{Page, View};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// The config directory, default is `~/.config/ebank`.
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// The data directory, holds the persisted session. Default is
    /// `~/.local/share/ebank`.
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    /// Log level: off, error, warn, info or debug.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }

    pub fn build_app(&self) -> Result<App> {
        let ps = self.build_path_set()?;
        let factory = ClientFactory::load(&ps)?;
        App::build(&factory)
    }

    /// Builds the app and navigates to `page`. Returns `None`, after printing
    /// whatever the router rendered instead, when the page cannot be shown.
    pub fn open_page(&self, page: Page) -> Result<Option<App>> {
        let mut app = self.build_app()?;
        let view = app.open(page.path())?;
        if view == View::Content(page) {
            return Ok(Some(app));
        }
        show_view(&app, view);
        Ok(None)
    }
}

/// How list results are printed.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    #[arg(long, short, default_value = "table")]
    pub output: DisplayStyle,

    /// Do not print table titles.
    #[arg(long)]
    pub headless: bool,
}

#[async_trait]
pub trait RunCommand {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()>;
}

/// Online banking from the terminal.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Account(account::AccountCommand),
    Config(config::ShowConfigArgs),
    Customer(customer::CustomerCommand),
    Dashboard(dashboard::DashboardArgs),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Open(open::OpenArgs),
    Password(password::PasswordArgs),
    Transfer(transfer::TransferArgs),
    Whoami(whoami::WhoamiArgs),
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let cfg = &self.config;
        match &self.command {
            Commands::Account(args) => args.run(cfg).await,
            Commands::Config(args) => args.run(cfg).await,
            Commands::Customer(args) => args.run(cfg).await,
            Commands::Dashboard(args) => args.run(cfg).await,
            Commands::Login(args) => args.run(cfg).await,
            Commands::Logout(args) => args.run(cfg).await,
            Commands::Open(args) => args.run(cfg).await,
            Commands::Password(args) => args.run(cfg).await,
            Commands::Transfer(args) => args.run(cfg).await,
            Commands::Whoami(args) => args.run(cfg).await,
        }
    }
}

/// Prints a rendered view along with the login notice, if any.
pub fn show_view(app: &App, view: View) {
    display_view(view, &app.location().to_string());
    if let Some(notice) = app.login_notice() {
        display_notice(notice);
    }
}

/// Turns a failed call into the command error. A rejected session sends the
/// app to the login page first.
pub fn request_failed(app: &mut App, err: RequestError, fallback: &str) -> anyhow::Error {
    debug!("Request failed, status {:?}: {err}", err.status());
    if err.is_session_expired() {
        match app.settle() {
            Ok(Some(view)) => show_view(app, view),
            Ok(None) => {}
            Err(err) => return err.context("navigate after failed request"),
        }
    }
    anyhow!("{}", err.user_message(fallback))
}

/// Reads a value from the terminal when it was not passed as an argument.
pub fn prompt(value: &Option<String>, label: &str, secure: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value.clone());
    }
    let term = Term::stderr();
    term.write_str(&format!("{label}: ")).context("write prompt")?;
    let line = if secure {
        term.read_secure_line()
    } else {
        term.read_line()
    };
    line.with_context(|| format!("read {}", label.to_lowercase()))
}
