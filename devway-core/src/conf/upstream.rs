use crate::conf::error::ConfigError;
use serde::{Serialize, Serializer};
use std::fmt;
use url::{Host, Url};

/// The backend every proxy rule forwards to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    url: Url,
    /// Host used for DNS resolution (IPv6 literals without brackets).
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub sni: String,
    /// `Host` header value sent when a rule rewrites the origin.
    authority: String,
    /// Target path without its trailing slash, prepended to forwarded paths.
    base_path: String,
}

impl UpstreamTarget {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ConfigError::invalid_upstream(raw, e.to_string()))?;

        let use_tls = match url.scheme() {
            "http" => false,
            "https" => true,
            other => {
                return Err(ConfigError::invalid_upstream(
                    raw,
                    format!("unsupported scheme '{other}' (expected http or https)"),
                ));
            }
        };

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(ConfigError::invalid_upstream(raw, "missing host")),
        };

        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::invalid_upstream(
                raw,
                "query strings and fragments are not supported",
            ));
        }

        let port = url
            .port_or_known_default()
            .ok_or_else(|| ConfigError::invalid_upstream(raw, "missing port"))?;

        // `host_str` keeps IPv6 brackets, which is what a Host header needs.
        let host_str = url.host_str().unwrap_or(&host);
        let authority = match url.port() {
            Some(port) => format!("{host_str}:{port}"),
            None => host_str.to_string(),
        };

        let base_path = url.path().trim_end_matches('/').to_string();
        let sni = if use_tls { host.clone() } else { String::new() };

        Ok(Self {
            url,
            host,
            port,
            use_tls,
            sni,
            authority,
            base_path,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Build the forwarded request target, preserving the client path.
    pub fn upstream_uri(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{}", self.base_path, path_and_query)
        } else {
            format!("{}/{}", self.base_path, path_and_query)
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl Serialize for UpstreamTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.url.as_str())
    }
}
