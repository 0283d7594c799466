//! Ticket identifier value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Numeric help-desk ticket identifier, kept as a string (it exceeds `u64`
/// comfort and is never used arithmetically).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Creates a TicketId, validating that it is a non-empty digit string.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("ticket_id"));
        }
        if !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "ticket_id",
                "must contain only digits",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TicketId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_long_digit_strings() {
        let id = TicketId::new("120349000058009045").unwrap();
        assert_eq!(id.as_str(), "120349000058009045");
        assert_eq!(id.to_string(), "120349000058009045");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            TicketId::new(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn rejects_non_digits() {
        assert!("12a4".parse::<TicketId>().is_err());
        assert!(" 124".parse::<TicketId>().is_err());
    }
}
