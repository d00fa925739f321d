use crate::error::ParseError;
use std::fmt;

/// Port used when a host token does not name one
pub const DEFAULT_PORT: u16 = 443;

/// A validated hostname/port pair
///
/// IPv6 literals are stored without brackets, [`HostAddress::dial_address`]
/// puts them back when an address string is needed for connecting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress {
    hostname: String,
    port: u16,
}

impl HostAddress {
    /// # Errors
    ///
    /// Returns an error if the hostname is empty or the port is zero
    pub fn new(hostname: impl Into<String>, port: u16) -> Result<Self, ParseError> {
        let hostname = hostname.into();
        if hostname.is_empty() {
            return Err(ParseError::EmptyHostname);
        }
        if port == 0 {
            return Err(ParseError::InvalidPort(port.to_string()));
        }
        Ok(Self { hostname, port })
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Address string suitable for `TcpStream::connect`, `[::1]:443` for IPv6
    #[must_use]
    pub fn dial_address(&self) -> String {
        if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// Parse a host token using [`DEFAULT_PORT`] when no port is given
///
/// # Errors
///
/// Returns a [`ParseError`] describing why the token is not a usable host
pub fn parse(token: &str) -> Result<HostAddress, ParseError> {
    parse_with_default(token, DEFAULT_PORT)
}

/// Parse `host`, `host:port`, `[ipv6]` or `[ipv6]:port`
///
/// Tokens with two or more colons and no brackets are taken verbatim as an
/// IPv6 literal on the default port, without validating the literal.
///
/// # Errors
///
/// Returns a [`ParseError`] describing why the token is not a usable host
pub fn parse_with_default(token: &str, default_port: u16) -> Result<HostAddress, ParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::EmptyHost);
    }

    if let Some(rest) = token.strip_prefix('[') {
        let (hostname, remainder) = rest
            .split_once(']')
            .ok_or_else(|| ParseError::MalformedIpv6(token.to_string()))?;
        if hostname.is_empty() {
            return Err(ParseError::EmptyIpv6);
        }
        if remainder.is_empty() {
            return HostAddress::new(hostname, default_port);
        }
        let port = remainder
            .strip_prefix(':')
            .ok_or_else(|| ParseError::MalformedSuffix(token.to_string()))?;
        return HostAddress::new(hostname, parse_port(port, default_port)?);
    }

    if token.matches(':').count() > 1 {
        return HostAddress::new(token, default_port);
    }

    let (hostname, port) = match token.split_once(':') {
        Some((hostname, port)) => (hostname.trim(), Some(port)),
        None => (token, None),
    };

    if hostname.is_empty() {
        return Err(ParseError::EmptyHostname);
    }

    let port = match port {
        Some(port) => parse_port(port, default_port)?,
        None => default_port,
    };

    HostAddress::new(hostname, port)
}

fn parse_port(port: &str, default_port: u16) -> Result<u16, ParseError> {
    let port = port.trim();
    if port.is_empty() {
        return Ok(default_port);
    }
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ParseError::InvalidPort(port.to_string())),
    }
}
