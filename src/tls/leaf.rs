use crate::{error::FetchError, report::CertificateRecord};
use chrono::{DateTime, Utc};
use rustls::pki_types::CertificateDer;
use x509_parser::{
    extensions::GeneralName,
    prelude::{FromDer, X509Certificate},
    public_key::PublicKey,
    time::ASN1Time,
    x509::X509Name,
};

const OID_ED25519: &str = "1.3.101.112";
const OID_ED448: &str = "1.3.101.113";

/// Pick the first certificate of the chain that is not a CA and turn it
/// into a [`CertificateRecord`] for `host`
///
/// Chains are usually leaf-first, but position 0 is not assumed to be the
/// leaf: the CA flag of the basic constraints decides.
///
/// # Errors
///
/// Returns [`FetchError::NoLeafCertificate`] when every certificate is a CA,
/// or [`FetchError::InvalidCertificate`] if a certificate cannot be parsed
pub fn select_leaf(host: &str, chain: &[CertificateDer<'_>]) -> Result<CertificateRecord, FetchError> {
    for der in chain {
        let cert = parse(der.as_ref())?;
        if is_ca(&cert) {
            continue;
        }
        return record_from(host, &cert);
    }

    Err(FetchError::NoLeafCertificate)
}

impl CertificateRecord {
    /// Extract the record fields from one DER-encoded certificate
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidCertificate`] if the DER cannot be parsed
    pub fn from_der(host: &str, der: &[u8]) -> Result<Self, FetchError> {
        record_from(host, &parse(der)?)
    }
}

fn parse(der: &[u8]) -> Result<X509Certificate<'_>, FetchError> {
    X509Certificate::from_der(der)
        .map(|(_, cert)| cert)
        .map_err(|e| FetchError::InvalidCertificate {
            reason: e.to_string(),
        })
}

fn is_ca(cert: &X509Certificate<'_>) -> bool {
    cert.basic_constraints()
        .ok()
        .flatten()
        .is_some_and(|bc| bc.value.ca)
}

fn record_from(host: &str, cert: &X509Certificate<'_>) -> Result<CertificateRecord, FetchError> {
    let validity = cert.validity();

    Ok(CertificateRecord {
        host: host.to_string(),
        common_name: common_name(cert.subject()),
        dns_names: dns_names(cert),
        not_before: to_utc(&validity.not_before)?,
        not_after: to_utc(&validity.not_after)?,
        public_key_algorithm: public_key_algorithm(cert),
        issuer: common_name(cert.issuer()),
    })
}

fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn dns_names(cert: &X509Certificate<'_>) -> Vec<String> {
    let Ok(Some(san)) = cert.subject_alternative_name() else {
        return Vec::new();
    };

    san.value
        .general_names
        .iter()
        .filter_map(|name| match name {
            GeneralName::DNSName(dns) => Some((*dns).to_string()),
            _ => None,
        })
        .collect()
}

fn public_key_algorithm(cert: &X509Certificate<'_>) -> String {
    let spki = cert.public_key();
    let name = match spki.parsed() {
        Ok(PublicKey::RSA(_)) => "RSA",
        Ok(PublicKey::EC(_)) => "ECDSA",
        Ok(PublicKey::DSA(_)) => "DSA",
        _ => match spki.algorithm.algorithm.to_id_string().as_str() {
            OID_ED25519 => "Ed25519",
            OID_ED448 => "Ed448",
            _ => "Unknown",
        },
    };
    name.to_string()
}

fn to_utc(time: &ASN1Time) -> Result<DateTime<Utc>, FetchError> {
    let raw = time.to_datetime();
    DateTime::<Utc>::from_timestamp(raw.unix_timestamp(), raw.nanosecond()).ok_or_else(|| {
        FetchError::InvalidCertificate {
            reason: format!("invalid certificate timestamp: {raw}"),
        }
    })
}
