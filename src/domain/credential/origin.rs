//! Origin allow-list patterns of the form `https://*.example.com/*`.
//!
//! Only requests whose URL matches one of these patterns are inspected for
//! credentials. Hosts may use a leading `*.` wildcard that also matches the
//! bare domain; paths may end in `*` to match any suffix.

use reqwest::Url;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    Any,
    Exact(String),
    WithSubdomains(String),
}

/// A single allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPattern {
    raw: String,
    scheme: Option<String>,
    host: HostPattern,
    path: String,
    path_is_prefix: bool,
}

impl OriginPattern {
    /// Returns true if the URL falls inside this pattern.
    pub fn matches(&self, url: &Url) -> bool {
        if let Some(scheme) = &self.scheme {
            if url.scheme() != scheme {
                return false;
            }
        }

        let host = match url.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return false,
        };
        let host_ok = match &self.host {
            HostPattern::Any => true,
            HostPattern::Exact(expected) => host == *expected,
            HostPattern::WithSubdomains(domain) => {
                host == *domain || host.ends_with(&format!(".{}", domain))
            }
        };
        if !host_ok {
            return false;
        }

        if self.path_is_prefix {
            url.path().starts_with(&self.path)
        } else {
            url.path() == self.path
        }
    }

    /// Parses and checks a URL string against this pattern.
    ///
    /// Unparseable URLs never match.
    pub fn matches_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.matches(&u)).unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for OriginPattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("origin_pattern"));
        }

        let (scheme, rest) = raw.split_once("://").ok_or_else(|| {
            ValidationError::invalid_format("origin_pattern", format!("missing scheme in '{}'", raw))
        })?;
        let scheme = match scheme {
            "*" => None,
            "http" | "https" => Some(scheme.to_string()),
            other => {
                return Err(ValidationError::invalid_format(
                    "origin_pattern",
                    format!("unsupported scheme '{}'", other),
                ))
            }
        };

        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/*"),
        };
        let host = host.to_ascii_lowercase();
        let host = if host == "*" {
            HostPattern::Any
        } else if let Some(domain) = host.strip_prefix("*.") {
            if domain.is_empty() || domain.contains('*') {
                return Err(ValidationError::invalid_format(
                    "origin_pattern",
                    format!("invalid host wildcard in '{}'", raw),
                ));
            }
            HostPattern::WithSubdomains(domain.to_string())
        } else if host.is_empty() || host.contains('*') {
            return Err(ValidationError::invalid_format(
                "origin_pattern",
                format!("invalid host in '{}'", raw),
            ));
        } else {
            HostPattern::Exact(host)
        };

        let (path, path_is_prefix) = match path.strip_suffix('*') {
            Some(prefix) => (prefix.to_string(), true),
            None => (path.to_string(), false),
        };
        if path.contains('*') {
            return Err(ValidationError::invalid_format(
                "origin_pattern",
                format!("only a trailing '*' is supported in paths: '{}'", raw),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme,
            host,
            path,
            path_is_prefix,
        })
    }
}

impl fmt::Display for OriginPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
