mod app;
mod client;
mod cmd;
mod config;
mod dirs;
mod display;
mod filelock;
mod logs;
mod router;
mod session;
mod storage;
mod store;
mod table;
mod time;
mod types;

use std::env;
use std::process;

use anyhow::Result;
use clap::error::ErrorKind as ArgsErrorKind;
use clap::Parser;

use crate::cmd::Cli;
use crate::display::display_error;

async fn run_cmd() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.use_stderr();
            if let Err(e) = err.print() {
                eprintln!("write help message to stderr: {e}");
            }
            if matches!(
                err.kind(),
                ArgsErrorKind::DisplayHelp
                    | ArgsErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ArgsErrorKind::DisplayVersion
            ) {
                return Ok(());
            }
            process::exit(3);
        }
    };

    let level = match cli.config.log_level {
        Some(ref level) => level.clone(),
        None => env::var("EBANK_LOG_LEVEL").unwrap_or_else(|_| String::from("warn")),
    };
    logs::init(&level)?;

    cli.run().await
}

#[tokio::main]
async fn main() {
    match run_cmd().await {
        Ok(()) => {}
        Err(e) => {
            display_error(&format!("Error: {e:#}"));
            process::exit(1);
        }
    }
}
