use crate::{
    checker::{CheckerConfig, DEFAULT_MAX_CONCURRENCY},
    cli::actions::{Action, HostsSource},
    output::OutputFormat,
    tls::DEFAULT_TIMEOUT,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if no hosts source is given or the concurrency is zero
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let hosts = if let Some(path) = matches.get_one::<PathBuf>("config") {
        HostsSource::File(path.clone())
    } else {
        let list = matches
            .get_one::<String>("domains")
            .context("either --config or --domains must be provided")?;
        HostsSource::List(list.clone())
    };

    // range checked by the value parser
    let timeout = matches
        .get_one::<u64>("timeout")
        .copied()
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

    let max_concurrency = matches
        .get_one::<usize>("concurrency")
        .copied()
        .unwrap_or(DEFAULT_MAX_CONCURRENCY);
    if max_concurrency == 0 {
        bail!("concurrency must be greater than 0");
    }

    let format = matches
        .get_one::<String>("output")
        .map_or(Ok(OutputFormat::default()), |s| s.parse::<OutputFormat>())
        .map_err(|e| anyhow!(e))?;

    let checker = CheckerConfig {
        timeout,
        skip_verify: matches.get_flag("insecure"),
        max_concurrency,
        ca: matches.get_one::<PathBuf>("ca").cloned(),
        ..CheckerConfig::default()
    };

    Ok(Action::Check {
        hosts,
        checker,
        format,
    })
}
