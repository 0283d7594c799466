//! CredentialObserver - passive capture of session cookies from outgoing traffic.
//!
//! Sits on the request path of allow-listed origins. It never modifies or
//! delays a request: inspection is synchronous and the captured value is
//! handed to the [`CredentialStore`](super::CredentialStore) over an
//! unbounded channel.

use http::header::COOKIE;
use http::HeaderMap;
use reqwest::Url;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::domain::credential::{CredentialObservation, CredentialThresholds, OriginPattern};

#[derive(Debug, Clone)]
pub struct CredentialObserver {
    allow_list: Vec<OriginPattern>,
    thresholds: CredentialThresholds,
    events: UnboundedSender<CredentialObservation>,
}

impl CredentialObserver {
    /// Creates an observer and the receiving end of its observation events.
    pub fn new(
        allow_list: Vec<OriginPattern>,
        thresholds: CredentialThresholds,
    ) -> (Self, UnboundedReceiver<CredentialObservation>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                allow_list,
                thresholds,
                events,
            },
            receiver,
        )
    }

    /// Returns true if requests to this URL are inspected.
    pub fn is_observed(&self, url: &Url) -> bool {
        self.allow_list.iter().any(|pattern| pattern.matches(url))
    }

    /// Inspects an outgoing request's headers and passes them through unchanged.
    ///
    /// A cookie header is captured when its length is at least the minimum
    /// (50 by default), the same inclusive bound the store uses for weak
    /// credentials, so anything captured can later be resolved.
    pub fn inspect(&self, url: &Url, headers: HeaderMap) -> HeaderMap {
        if !self.is_observed(url) {
            return headers;
        }

        let cookie = match headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            Some(cookie) => cookie,
            None => return headers,
        };

        if !self.thresholds.classify(cookie.len()).is_acceptable() {
            trace!(url = %url, length = cookie.len(), "Cookie header below minimum length");
            return headers;
        }

        let observation = CredentialObservation::new(url.as_str(), cookie);
        if self.events.send(observation).is_err() {
            debug!("Credential store is gone, dropping observation");
        }
        headers
    }
}
