use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use env_logger::Target;
use log::LevelFilter;
use std::{env, io::Write};

/// Map the number of `-v` flags to a log level
#[must_use]
pub const fn verbosity_level(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize logging on stderr
///
/// `RUST_LOG` is read first; a `-v` flag, or the absence of `RUST_LOG`,
/// sets the level of this crate. stdout is left to the report.
///
/// # Errors
///
/// Returns an error if a logger is already installed
pub fn init(verbosity: u8) -> Result<()> {
    let level = verbosity_level(verbosity);

    let mut builder = env_logger::Builder::from_default_env();
    builder.target(Target::Stderr);

    if verbosity > 0 || env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
        builder.filter_module(env!("CARGO_CRATE_NAME"), level);
    }

    // rustls is chatty at debug
    if level < LevelFilter::Trace {
        builder.filter_module("rustls", LevelFilter::Warn);
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {} [{}] {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder.try_init().context("failed to initialize logger")?;

    Ok(())
}
