use std::io::{self, IsTerminal};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// HTTP stack crates, kept at `warn` unless we debug.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "mio"];

fn parse_level(level: &str) -> Result<LevelFilter> {
    Ok(match level.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => bail!("unknown log level '{level}'"),
    })
}

/// Logs go to stderr, stdout only carries command output.
pub fn init(level: &str) -> Result<()> {
    let level = parse_level(level)?;
    let colored = io::stderr().is_terminal();
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Magenta)
        .trace(Color::BrightBlack);

    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = humantime::format_rfc3339_millis(SystemTime::now());
            if colored {
                out.finish(format_args!("{now} [{}] {message}", colors.color(record.level())))
            } else {
                out.finish(format_args!("{now} [{}] {message}", record.level()))
            }
        })
        .level(level);

    if level < LevelFilter::Trace {
        for target in NOISY_TARGETS {
            dispatch = dispatch.level_for(*target, level.min(LevelFilter::Warn));
        }
    }

    dispatch.chain(io::stderr()).apply().context("init logger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert_eq!(parse_level("warning").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level(" Debug ").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("TRACE").unwrap(), LevelFilter::Trace);
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
    }
}
