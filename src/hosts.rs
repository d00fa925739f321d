//! Where the list of hosts comes from: a comma-separated string or a YAML
//! file with a `hosts` key.

use crate::{error::HostsError, host};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Layout of the hosts file
///
/// ```yaml
/// hosts:
///   - example.com
///   - example.org:8443
///   - "[::1]:443"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct HostsFile {
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Split a comma-separated list, dropping empty entries
///
/// # Errors
///
/// Returns an error if the string is empty, holds no entries, or any entry
/// is not a valid host
pub fn from_list(list: &str) -> Result<Vec<String>, HostsError> {
    if list.is_empty() {
        return Err(HostsError::EmptyList);
    }

    let mut hosts = Vec::new();
    for (i, part) in list.split(',').enumerate() {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        validate(trimmed).map_err(|reason| HostsError::InvalidDomain {
            position: i + 1,
            host: trimmed.to_string(),
            reason,
        })?;

        hosts.push(trimmed.to_string());
    }

    if hosts.is_empty() {
        return Err(HostsError::NoValidDomains);
    }

    Ok(hosts)
}

/// Read the `hosts` list of a YAML file
///
/// # Errors
///
/// Returns an error if the path is empty, missing or cannot be inspected,
/// the file is empty or not valid YAML, the list is empty, or an entry is
/// not a valid host
pub async fn load_file(path: &Path) -> Result<Vec<String>, HostsError> {
    if path.as_os_str().is_empty() {
        return Err(HostsError::EmptyPath);
    }

    let exists = fs::try_exists(path)
        .await
        .map_err(|source| HostsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if !exists {
        return Err(HostsError::NotFound(path.to_path_buf()));
    }

    let data = fs::read_to_string(path)
        .await
        .map_err(|source| HostsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    parse_yaml(&data)
}

/// Parse the content of a hosts file
///
/// # Errors
///
/// Same as [`load_file`] minus the I/O part
pub fn parse_yaml(data: &str) -> Result<Vec<String>, HostsError> {
    if data.trim().is_empty() {
        return Err(HostsError::EmptyFile);
    }

    let file: HostsFile = serde_yaml::from_str(data)?;
    if file.hosts.is_empty() {
        return Err(HostsError::NoHosts);
    }

    for (index, host) in file.hosts.iter().enumerate() {
        validate(host).map_err(|reason| HostsError::InvalidHost { index, reason })?;
    }

    Ok(file.hosts)
}

/// A host entry must parse and its hostname must not contain whitespace
fn validate(entry: &str) -> Result<(), String> {
    let address = host::parse(entry).map_err(|e| e.to_string())?;
    if address.hostname().chars().any(char::is_whitespace) {
        return Err(format!(
            "hostname cannot contain spaces: {}",
            address.hostname()
        ));
    }
    Ok(())
}
