use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{show_view, ConfigArgs, RunCommand};

/// Navigate to locations in order and print the page rendered for each, for
/// example `ebank open /` or `ebank open /client/transfer`.
#[derive(Args)]
pub struct OpenArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Go back one entry after the last location.
    #[arg(long)]
    pub back: bool,
}

#[async_trait]
impl RunCommand for OpenArgs {
    async fn run(&self, cfg: &ConfigArgs) -> Result<()> {
        let mut app = cfg.build_app()?;
        for path in self.paths.iter() {
            let view = app.open(path)?;
            show_view(&app, view);
        }

        if self.back {
            match app.back()? {
                Some(view) => show_view(&app, view),
                None => println!("No previous page"),
            }
        }
        Ok(())
    }
}
