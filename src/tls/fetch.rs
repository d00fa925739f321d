use super::{TlsConfig, verifier::build_client_config};
use crate::{error::FetchError, host::HostAddress};
use anyhow::Result;
use rustls::pki_types::{CertificateDer, ServerName};
use std::{future::Future, io, net::IpAddr, sync::Arc, time::Duration};
use tokio::{
    net::TcpStream,
    time::{Instant, timeout_at},
};
use tokio_rustls::TlsConnector;
use tokio_util::sync::CancellationToken;

/// Used when `now + timeout` is not representable
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Anything able to hand back the certificate chain presented by a host
///
/// [`TlsFetcher`] is the real thing; the checker only depends on this trait
/// so the fan-out can be exercised without a network.
pub trait CertificateSource: Send + Sync + 'static {
    /// Retrieve the peer chain, exactly as presented, for `address`
    fn fetch(
        &self,
        address: &HostAddress,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<CertificateDer<'static>>, FetchError>> + Send;
}

/// Performs one TCP connect + TLS handshake per call
#[derive(Clone)]
pub struct TlsFetcher {
    connector: TlsConnector,
    config: TlsConfig,
}

impl std::fmt::Debug for TlsFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TlsFetcher {
    /// # Errors
    ///
    /// Returns an error if the TLS client configuration cannot be built
    pub async fn new(config: TlsConfig) -> Result<Self> {
        let client_config = build_client_config(&config).await?;
        Ok(Self {
            connector: TlsConnector::from(Arc::new(client_config)),
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TlsConfig {
        &self.config
    }

    async fn peer_certificates(
        &self,
        address: &HostAddress,
        cancel: &CancellationToken,
    ) -> Result<Vec<CertificateDer<'static>>, FetchError> {
        let dial = address.dial_address();
        let cancelled = || FetchError::Cancelled {
            address: dial.clone(),
        };

        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        // one deadline covers resolving, connecting and the handshake
        let deadline = deadline_after(Instant::now(), self.config.timeout);

        let server_name =
            server_name_from_host(address.hostname()).map_err(|reason| FetchError::Handshake {
                address: dial.clone(),
                reason,
            })?;

        let connect = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled()),
            result = timeout_at(deadline, TcpStream::connect(dial.as_str())) => result,
        };

        let stream = match connect {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                if cancel.is_cancelled() {
                    return Err(cancelled());
                }
                return Err(FetchError::Connect {
                    address: dial.clone(),
                    source,
                });
            }
            Err(_) => {
                return Err(FetchError::Connect {
                    address: dial.clone(),
                    source: io::Error::new(io::ErrorKind::TimedOut, "i/o timeout"),
                });
            }
        };

        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        log::trace!("connected to {dial}, starting TLS handshake");

        let handshake = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled()),
            result = timeout_at(deadline, self.connector.connect(server_name, stream)) => result,
        };

        // cancellation wins over whatever the handshake reported
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        let tls_stream = match handshake {
            Ok(Ok(tls_stream)) => tls_stream,
            Ok(Err(e)) => {
                return Err(FetchError::Handshake {
                    address: dial.clone(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(FetchError::Handshake {
                    address: dial.clone(),
                    reason: "i/o timeout".to_string(),
                });
            }
        };

        let (_, connection) = tls_stream.get_ref();
        let chain: Vec<CertificateDer<'static>> = connection
            .peer_certificates()
            .unwrap_or_default()
            .iter()
            .map(|cert| cert.clone().into_owned())
            .collect();

        if chain.is_empty() {
            return Err(FetchError::NoCertificates { address: dial });
        }

        Ok(chain)
    }
}

impl CertificateSource for TlsFetcher {
    async fn fetch(
        &self,
        address: &HostAddress,
        cancel: &CancellationToken,
    ) -> Result<Vec<CertificateDer<'static>>, FetchError> {
        self.peer_certificates(address, cancel).await
    }
}

fn deadline_after(now: Instant, timeout: Duration) -> Instant {
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// SNI for `host`: IP literals become IP server names, anything else must be
/// a valid DNS name
///
/// # Errors
///
/// Returns a description of why rustls refused the name
pub fn server_name_from_host(host: &str) -> Result<ServerName<'static>, String> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.parse::<IpAddr>().map_or_else(
        |_| ServerName::try_from(host.to_string()).map_err(|_| format!("invalid server name: {host}")),
        |ip| Ok(ServerName::from(ip)),
    )
}
