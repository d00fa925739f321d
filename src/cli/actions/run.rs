use super::Action;
use crate::{checker::Checker, output};
use anyhow::Context;
use log::{info, warn};
use std::io;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Execute the action's business logic by delegating to the appropriate module
pub async fn execute(action: Action) -> anyhow::Result<()> {
    match action {
        Action::Check {
            hosts,
            checker,
            format,
        } => {
            let hosts = hosts.load().await.context("failed to load hosts")?;

            let checker = Checker::new(checker)
                .await
                .context("failed to create checker")?;

            let cancel = CancellationToken::new();
            let signals = tokio::spawn(cancel_on_signal(cancel.clone()));

            let result = checker.check(&hosts, &cancel).await;
            signals.abort();

            let report = result.context("failed to check certificates")?;
            info!(
                "{} certificate(s), {} error(s)",
                report.certificates.len(),
                report.failures.len()
            );

            let stdout = io::stdout();
            let stderr = io::stderr();
            output::render(&report, format, &mut stdout.lock(), &mut stderr.lock())
        }
    }
}

/// Cancel `cancel` on SIGINT or SIGTERM
async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("received shutdown signal, cancelling pending checks");
    cancel.cancel();
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::{
        checker::CheckerConfig, cli::actions::HostsSource, output::OutputFormat,
    };
    use std::time::Duration;

    #[tokio::test]
    async fn test_execute_invalid_hosts() {
        let action = Action::Check {
            hosts: HostsSource::List(",,".to_string()),
            checker: CheckerConfig::default(),
            format: OutputFormat::Table,
        };

        let err = action.execute().await.unwrap_err();
        assert!(err.to_string().contains("failed to load hosts"));
    }

    #[tokio::test]
    async fn test_execute_unreadable_ca() {
        let action = Action::Check {
            hosts: HostsSource::List("example.com".to_string()),
            checker: CheckerConfig {
                ca: Some("/non/existent/ca.pem".into()),
                ..CheckerConfig::default()
            },
            format: OutputFormat::Table,
        };

        let err = action.execute().await.unwrap_err();
        assert!(err.to_string().contains("failed to create checker"));
    }

    #[tokio::test]
    async fn test_execute_unreachable_host_reports_failure() {
        // per-host failures are rendered, not returned
        let port = std::net::TcpListener::bind(("127.0.0.1", 0))
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let action = Action::Check {
            hosts: HostsSource::List(format!("127.0.0.1:{port}")),
            checker: CheckerConfig {
                timeout: Duration::from_secs(1),
                ..CheckerConfig::default()
            },
            format: OutputFormat::Json,
        };

        assert!(action.execute().await.is_ok());
    }
}
