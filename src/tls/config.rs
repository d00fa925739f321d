use std::{path::PathBuf, str::FromStr, time::Duration};

/// Default time allowed to connect and finish the handshake with one host
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest per-host timeout accepted on the command line
pub const MAX_TIMEOUT: Duration = Duration::from_secs(86_400);

/// TLS settings shared by every connection of a check
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Upper bound for DNS + TCP connect + TLS handshake of one host
    pub timeout: Duration,
    pub mode: VerifyMode,
    /// Extra trust anchors (PEM bundle) added to the webpki roots
    pub ca: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            mode: VerifyMode::default(),
            ca: None,
        }
    }
}

impl TlsConfig {
    #[must_use]
    pub const fn skip_verify(&self) -> bool {
        matches!(self.mode, VerifyMode::Insecure)
    }
}

/// Whether the peer chain is verified during the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// Verify chain and hostname against the trust anchors
    #[default]
    Verify,
    /// Accept any certificate, only used to read what the peer presents
    Insecure,
}

impl From<bool> for VerifyMode {
    fn from(skip_verify: bool) -> Self {
        if skip_verify {
            Self::Insecure
        } else {
            Self::Verify
        }
    }
}

impl FromStr for VerifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verify" => Ok(Self::Verify),
            "insecure" => Ok(Self::Insecure),
            _ => Err(format!("Invalid verify mode: {s}")),
        }
    }
}
