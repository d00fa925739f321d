use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and validity window of the leaf certificate of one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// `hostname:port` that was checked
    pub host: String,
    pub common_name: String,
    pub dns_names: Vec<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub public_key_algorithm: String,
    /// Common name of the issuer
    pub issuer: String,
}

impl CertificateRecord {
    /// Whole days until `not_after`, negative once expired
    #[must_use]
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.not_after - now).num_days()
    }
}

/// Why a single host produced no certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub host: String,
    #[serde(rename = "error")]
    pub message: String,
}

impl FailureRecord {
    pub fn new(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one check: every requested host appears exactly once,
/// either in `certificates` or in `failures`
///
/// Order inside both lists follows completion order and is not stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub certificates: Vec<CertificateRecord>,
    #[serde(rename = "errors", default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureRecord>,
}

impl Report {
    #[must_use]
    pub fn with_capacity(hosts: usize) -> Self {
        Self {
            certificates: Vec::with_capacity(hosts),
            failures: Vec::new(),
        }
    }

    /// Number of hosts accounted for
    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len() + self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty() && self.failures.is_empty()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
