//! Validated transitions for state enums.

use super::ValidationError;

/// A state enum that declares its legal edges.
///
/// States may carry data (for example the ticket a navigation is pending
/// for), so only `Clone` is required.
pub trait StateMachine: Sized + Clone + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns `target` if the edge exists.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "state_transition",
                format!("{:?} -> {:?} is not allowed", self, target),
            ));
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Light {
        Off,
        On(u8),
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            matches!((self, target), (Light::Off, Light::On(_)) | (Light::On(_), Light::Off))
        }
    }

    #[test]
    fn declared_edge_is_taken() {
        assert_eq!(Light::Off.transition_to(Light::On(3)), Ok(Light::On(3)));
    }

    #[test]
    fn undeclared_edge_reports_both_states() {
        let err = Light::On(1).transition_to(Light::On(2)).unwrap_err();
        assert!(err.to_string().contains("On(1) -> On(2)"));
    }
}
