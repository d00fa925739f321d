//! TLS certificate retrieval
//!
//! This module opens the outbound TLS connections and turns the presented
//! chain into a [`crate::report::CertificateRecord`].
//!
//! # Module Organization
//!
//! - `config` - Timeout, verification mode and extra trust anchors
//! - `fetch` - Connect + handshake, returns the peer chain
//! - `leaf` - Leaf selection and certificate field extraction
//! - `verifier` - rustls client configuration and the no-op verifier
//!
//! # Example
//!
//! ```rust,ignore
//! use certsweep::tls::{CertificateSource, TlsConfig, TlsFetcher, select_leaf};
//!
//! let fetcher = TlsFetcher::new(TlsConfig::default()).await?;
//! let address = certsweep::host::parse("example.com")?;
//! let chain = fetcher.fetch(&address, &cancel).await?;
//! let record = select_leaf(&address.to_string(), &chain)?;
//! ```

pub mod config;
pub mod fetch;
pub mod leaf;
pub mod verifier;

// Re-export commonly used types
pub use config::{DEFAULT_TIMEOUT, MAX_TIMEOUT, TlsConfig, VerifyMode};
pub use fetch::{CertificateSource, TlsFetcher, server_name_from_host};
pub use leaf::select_leaf;
pub use verifier::{NoVerifier, build_client_config, ensure_crypto_provider};
