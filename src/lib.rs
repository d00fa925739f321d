//! Fetch and report the leaf TLS certificate of many hosts at once.
//!
//! Hosts are checked concurrently over a bounded pool of connections; every
//! host ends up either as a [`CertificateRecord`] or as a [`FailureRecord`]
//! in the returned [`Report`].
//!
//! ```rust,ignore
//! use certsweep::{Checker, CheckerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let checker = Checker::new(CheckerConfig::default()).await?;
//! let hosts = vec!["example.com".to_string(), "example.org:8443".to_string()];
//! let report = checker.check(&hosts, &CancellationToken::new()).await?;
//! ```

pub mod checker;
pub mod cli;
pub mod error;
pub mod host;
pub mod hosts;
pub mod output;
pub mod report;
pub mod tls;

pub use checker::{Checker, CheckerConfig, DEFAULT_MAX_CONCURRENCY};
pub use error::{CheckError, FetchError, HostsError, ParseError};
pub use host::{DEFAULT_PORT, HostAddress};
pub use output::OutputFormat;
pub use report::{CertificateRecord, FailureRecord, Report};
