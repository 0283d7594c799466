//! Credential module - session credentials, their sources and acceptance rules.

mod cookie;
mod credential;
mod errors;
mod observation;
mod origin;
mod thresholds;

pub use cookie::{join_cookie_header, merge_cookies, CookiePair};
pub use credential::{select_best, Credential, CredentialTier};
pub use errors::CredentialError;
pub use observation::CredentialObservation;
pub use origin::OriginPattern;
pub use thresholds::{CredentialStrength, CredentialThresholds};
