//! Shared error taxonomy for the instrumentation layer.
//!
//! The propagation policy is strict: nothing in this layer may panic into or
//! return an error into the application code it instruments. Fallible
//! operations return `Result` so call sites can log and swallow.

use std::fmt;

/// Instrumentation subsystems gated by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Analytics,
    ErrorReporting,
    Auth,
}

impl Subsystem {
    /// Stable string form used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Analytics => "analytics",
            Subsystem::ErrorReporting => "error_reporting",
            Subsystem::Auth => "auth",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure delivering an event through an analytics sink.
///
/// Swallowed at every emission site; surfaced only through logs.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("analytics backend rejected the event: {0}")]
    Rejected(String),

    #[error("analytics client is unavailable")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_strings() {
        assert_eq!(Subsystem::Analytics.as_str(), "analytics");
        assert_eq!(Subsystem::ErrorReporting.as_str(), "error_reporting");
        assert_eq!(Subsystem::Auth.as_str(), "auth");
    }
}
