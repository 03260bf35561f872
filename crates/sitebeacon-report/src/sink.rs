//! Capture sink contract shared by the server and edge paths.

use sitebeacon_core::event::ErrorCaptureEvent;

use crate::RuntimeContext;
use crate::transport::TransportError;

/// Installed capture path for one runtime context.
///
/// `capture` must tolerate concurrent invocation for independent requests
/// and must never block the request path; both implementations hand the
/// envelope off and return immediately.
pub trait ErrorSink: Send + Sync {
    /// Accept one capture envelope for delivery.
    fn capture(&self, event: ErrorCaptureEvent) -> Result<(), ReportError>;

    /// The context this sink was initialized for.
    fn context(&self) -> RuntimeContext;
}

/// Capture-path failures, swallowed before they reach application code.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("capture queue is full; envelope dropped")]
    QueueFull,

    #[error("capture queue is closed")]
    QueueClosed,

    #[error("no async runtime available for delivery")]
    NoRuntime,

    #[error("failed to serialize capture envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
