//! Error types for host parsing, certificate retrieval and the check itself.
//!
//! Everything that can be attributed to a single host ends up as a
//! [`crate::report::FailureRecord`]; only [`CheckError`] aborts a whole call.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A host token that could not be turned into a hostname/port pair
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("host cannot be empty")]
    EmptyHost,

    #[error("invalid IPv6 address format (missing closing bracket): {0}")]
    MalformedIpv6(String),

    #[error("IPv6 address cannot be empty")]
    EmptyIpv6,

    #[error("invalid format after IPv6 address: {0}")]
    MalformedSuffix(String),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("hostname cannot be empty")]
    EmptyHostname,
}

/// Failure while retrieving the certificate of one host
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS resolution, TCP refusal or the dial deadline elapsing
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    /// TLS negotiation failed, including untrusted chains when verifying
    #[error("TLS handshake failed for {address}: {reason}")]
    Handshake { address: String, reason: String },

    #[error("no peer certificates found for {address}")]
    NoCertificates { address: String },

    #[error("no valid leaf certificate found")]
    NoLeafCertificate,

    #[error("failed to parse peer certificate: {reason}")]
    InvalidCertificate { reason: String },

    #[error("connection to {address} was cancelled")]
    Cancelled { address: String },
}

/// Conditions that abort a whole check, no report is produced
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("no hosts provided")]
    NoHosts,

    #[error("certificate check was cancelled")]
    Cancelled,
}

/// Problems with the list of hosts handed to the checker
#[derive(Debug, Error)]
pub enum HostsError {
    #[error("domains string cannot be empty")]
    EmptyList,

    #[error("no valid domains found in the provided string")]
    NoValidDomains,

    #[error("invalid domain at position {position} ({host}): {reason}")]
    InvalidDomain {
        position: usize,
        host: String,
        reason: String,
    },

    #[error("config file path cannot be empty")]
    EmptyPath,

    #[error("config file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file is empty")]
    EmptyFile,

    #[error("invalid YAML format: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no hosts found in config file")]
    NoHosts,

    #[error("invalid host at index {index}: {reason}")]
    InvalidHost { index: usize, reason: String },
}
