//! Cookie pairs and the merge rules for assembling a credential from them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single cookie as returned by a cookie-jar query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePair {
    pub name: String,
    pub value: String,
}

impl CookiePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Merges per-domain cookie lists, keeping the first cookie seen for each name.
///
/// Batches are consumed in order, so the domain queried first wins.
pub fn merge_cookies<I>(batches: I) -> Vec<CookiePair>
where
    I: IntoIterator<Item = Vec<CookiePair>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for cookie in batches.into_iter().flatten() {
        if seen.insert(cookie.name.clone()) {
            merged.push(cookie);
        }
    }
    merged
}

/// Joins cookies into the `Cookie` header wire format: `a=1; b=2`.
pub fn join_cookie_header(cookies: &[CookiePair]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}
