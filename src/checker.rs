use crate::{
    error::{CheckError, FetchError},
    host::{self, DEFAULT_PORT, HostAddress},
    report::{CertificateRecord, FailureRecord, Report},
    tls::{CertificateSource, DEFAULT_TIMEOUT, TlsConfig, TlsFetcher, VerifyMode, select_leaf},
};
use futures::FutureExt;
use log::{debug, info, warn};
use std::{
    collections::HashMap,
    panic::AssertUnwindSafe,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    sync::Semaphore,
    task::{self, JoinSet},
};
use tokio_util::sync::CancellationToken;

/// Simultaneous outbound connections allowed per check
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Settings of one [`Checker`]
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Per-host bound for connect + handshake
    pub timeout: Duration,
    pub skip_verify: bool,
    /// Width of the worker pool, independent of the number of hosts
    pub max_concurrency: usize,
    /// Port used for tokens that do not name one
    pub default_port: u16,
    /// Extra trust anchors (PEM bundle)
    pub ca: Option<PathBuf>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            skip_verify: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            default_port: DEFAULT_PORT,
            ca: None,
        }
    }
}

impl CheckerConfig {
    #[must_use]
    pub fn tls(&self) -> TlsConfig {
        TlsConfig {
            timeout: self.timeout,
            mode: VerifyMode::from(self.skip_verify),
            ca: self.ca.clone(),
        }
    }
}

enum Outcome {
    Certificate(CertificateRecord),
    Failure(FailureRecord),
}

/// Fans a list of hosts out over a bounded pool of TLS connections
#[derive(Debug)]
pub struct Checker<S = TlsFetcher> {
    source: Arc<S>,
    max_concurrency: usize,
    default_port: u16,
}

impl Checker<TlsFetcher> {
    /// Build a checker that talks TLS to the real hosts
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS client configuration cannot be built,
    /// for example when the CA bundle is unreadable
    pub async fn new(config: CheckerConfig) -> anyhow::Result<Self> {
        let fetcher = TlsFetcher::new(config.tls()).await?;
        Ok(Self::with_source(&config, fetcher))
    }
}

impl<S: CertificateSource> Checker<S> {
    /// Build a checker around any [`CertificateSource`]
    pub fn with_source(config: &CheckerConfig, source: S) -> Self {
        Self {
            source: Arc::new(source),
            max_concurrency: config.max_concurrency.max(1),
            default_port: config.default_port,
        }
    }

    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Check every host and collect one record per host
    ///
    /// Per-host problems (bad token, refused connection, failed handshake, no
    /// leaf certificate, cancellation while in flight) end up in
    /// [`Report::failures`]. The call itself only fails when `hosts` is empty
    /// or when `cancel` fires before every host has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NoHosts`] or [`CheckError::Cancelled`]
    pub async fn check(
        &self,
        hosts: &[String],
        cancel: &CancellationToken,
    ) -> Result<Report, CheckError> {
        if hosts.is_empty() {
            return Err(CheckError::NoHosts);
        }

        let started = Instant::now();
        let mut report = Report::with_capacity(hosts.len());
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut workers = JoinSet::new();
        let mut in_flight = HashMap::with_capacity(hosts.len());

        info!(
            "checking {} host(s), up to {} at a time",
            hosts.len(),
            self.max_concurrency
        );

        for token in hosts {
            if cancel.is_cancelled() {
                warn!("check cancelled, aborting {} in-flight host(s)", workers.len());
                // dropping the set aborts the workers
                return Err(CheckError::Cancelled);
            }

            let address = match host::parse_with_default(token, self.default_port) {
                Ok(address) => address,
                Err(e) => {
                    debug!("{token}: invalid host format: {e}");
                    report.failures.push(FailureRecord::new(
                        token.clone(),
                        format!("invalid host format: {e}"),
                    ));
                    continue;
                }
            };

            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let host = address.to_string();
            let handle = workers.spawn(async move {
                let host = address.to_string();
                AssertUnwindSafe(check_host(source.as_ref(), &semaphore, address, &cancel))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Outcome::Failure(FailureRecord::new(host, "certificate check panicked"))
                    })
            });
            in_flight.insert(handle.id(), host);
        }

        debug!("dispatched {} host(s)", workers.len());

        collect(&mut workers, &mut in_flight, &mut report).await;

        info!(
            "checked {} host(s) in {:.2}s: {} certificate(s), {} failure(s)",
            report.len(),
            started.elapsed().as_secs_f64(),
            report.certificates.len(),
            report.failures.len()
        );

        Ok(report)
    }
}

/// Drain `workers` into `report`; a worker that did not complete still
/// leaves a failure for its host
async fn collect(
    workers: &mut JoinSet<Outcome>,
    in_flight: &mut HashMap<task::Id, String>,
    report: &mut Report,
) {
    while let Some(joined) = workers.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                in_flight.remove(&id);
                match outcome {
                    Outcome::Certificate(record) => report.certificates.push(record),
                    Outcome::Failure(failure) => report.failures.push(failure),
                }
            }
            Err(e) => {
                let host = in_flight.remove(&e.id()).unwrap_or_default();
                warn!("{host}: certificate worker did not complete: {e}");
                report.failures.push(FailureRecord::new(
                    host,
                    format!("certificate check did not complete: {e}"),
                ));
            }
        }
    }
}

async fn check_host<S: CertificateSource>(
    source: &S,
    semaphore: &Semaphore,
    address: HostAddress,
    cancel: &CancellationToken,
) -> Outcome {
    let host = address.to_string();

    let permit = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            return failure(host, &FetchError::Cancelled { address: address.dial_address() });
        }
        permit = semaphore.acquire() => permit,
    };
    let Ok(_permit) = permit else {
        return failure(host, &FetchError::Cancelled {
            address: address.dial_address(),
        });
    };

    let result = source
        .fetch(&address, cancel)
        .await
        .and_then(|chain| select_leaf(&host, &chain));

    match result {
        Ok(record) => {
            debug!("{host}: {} valid until {}", record.common_name, record.not_after);
            Outcome::Certificate(record)
        }
        Err(e) => failure(host, &e),
    }
}

fn failure(host: String, error: &FetchError) -> Outcome {
    debug!("{host}: {error}");
    Outcome::Failure(FailureRecord::new(host, error.to_string()))
}
