//! # Sitebeacon Report
//!
//! Runtime-context-aware error capture. Registration resolves the execution
//! environment once, loads exactly one of two initialization paths (a full
//! server process with a background delivery worker, or an isolated edge
//! runtime with per-event delivery), and installs a capture hook that
//! forwards errors with request and routing context. A disabled process
//! installs nothing at all.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod dsn;
mod edge;
pub mod reporter;
mod server;
pub mod sink;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dsn::{Dsn, DsnError};
pub use reporter::{ErrorReporter, RegisterError, RegisterOutcome};
pub use sink::{ErrorSink, ReportError};
pub use transport::{LogTransport, Transport, TransportError};

/// Execution environment, resolved once at registration time.
///
/// Immutable for the context's lifetime; it selects which initialization
/// path runs and is never consulted again per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeContext {
    /// Full server process: long-lived, may own background tasks.
    Server,
    /// Edge-isolated runtime: short-lived, no long-lived tasks.
    Edge,
}

impl RuntimeContext {
    /// Parse the externally supplied runtime tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "server" => Some(RuntimeContext::Server),
            "edge" => Some(RuntimeContext::Edge),
            _ => None,
        }
    }

    /// Stable string form used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeContext::Server => "server",
            RuntimeContext::Edge => "edge",
        }
    }
}

impl fmt::Display for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_context_tags() {
        assert_eq!(RuntimeContext::from_tag("server"), Some(RuntimeContext::Server));
        assert_eq!(RuntimeContext::from_tag("edge"), Some(RuntimeContext::Edge));
        assert_eq!(RuntimeContext::from_tag("browser"), None);
        assert_eq!(RuntimeContext::Server.as_str(), "server");
    }
}
