//! Cookie jar adapters - implementations of the `CookieJar` port.

mod in_memory_cookie_jar;
mod netscape_cookie_jar;

pub use in_memory_cookie_jar::InMemoryCookieJar;
pub use netscape_cookie_jar::NetscapeCookieJar;

/// Returns true if a cookie set for `cookie_domain` is visible to a query
/// for `query_domain` (same domain or a subdomain of it).
pub(crate) fn domain_matches(cookie_domain: &str, query_domain: &str) -> bool {
    let cookie = cookie_domain.trim_start_matches('.').to_ascii_lowercase();
    let query = query_domain.trim_start_matches('.').to_ascii_lowercase();
    if query.is_empty() {
        return false;
    }
    cookie == query || cookie.ends_with(&format!(".{}", query))
}
