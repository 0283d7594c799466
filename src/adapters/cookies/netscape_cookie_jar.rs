//! Cookie jar backed by a Netscape `cookies.txt` export.
//!
//! Each non-comment line holds seven tab-separated fields:
//! `domain  include_subdomains  path  secure  expiry  name  value`.
//! Lines prefixed with `#HttpOnly_` are HTTP-only cookies, not comments.
//! The file is re-read on every query so fresh exports are picked up.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::domain_matches;
use crate::domain::credential::CookiePair;
use crate::domain::foundation::Timestamp;
use crate::ports::{CookieJar, CookieJarError};

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CookieLine {
    domain: String,
    expires_at: i64,
    cookie: CookiePair,
}

/// Cookie jar reading a `cookies.txt` file.
#[derive(Debug, Clone)]
pub struct NetscapeCookieJar {
    path: PathBuf,
}

impl NetscapeCookieJar {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn parse(contents: &str) -> Result<Vec<CookieLine>, CookieJarError> {
        let mut lines = Vec::new();
        for (index, raw) in contents.lines().enumerate() {
            let line = match raw.strip_prefix(HTTP_ONLY_PREFIX) {
                Some(rest) => rest,
                None if raw.starts_with('#') => continue,
                None => raw,
            };
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 7 {
                return Err(CookieJarError::Malformed {
                    line: index + 1,
                    reason: format!("expected 7 tab-separated fields, found {}", fields.len()),
                });
            }
            let expires_at = fields[4].trim().parse::<i64>().map_err(|e| CookieJarError::Malformed {
                line: index + 1,
                reason: format!("invalid expiry: {}", e),
            })?;

            lines.push(CookieLine {
                domain: fields[0].to_string(),
                expires_at,
                cookie: CookiePair::new(fields[5], fields[6]),
            });
        }
        Ok(lines)
    }
}

#[async_trait]
impl CookieJar for NetscapeCookieJar {
    async fn query_by_domain(&self, domain: &str) -> Result<Vec<CookiePair>, CookieJarError> {
        let contents = fs::read_to_string(&self.path)
            .await
            .map_err(|e| CookieJarError::Unavailable(format!("{}: {}", self.path.display(), e)))?;

        let now_secs = Timestamp::now().as_unix_millis() / 1000;
        Ok(Self::parse(&contents)?
            .into_iter()
            // An expiry of 0 marks a session cookie.
            .filter(|line| line.expires_at == 0 || line.expires_at > now_secs)
            .filter(|line| domain_matches(&line.domain, domain))
            .map(|line| line.cookie)
            .collect())
    }
}
