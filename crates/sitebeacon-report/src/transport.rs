//! Delivery seam between capture sinks and the reporting backend.
//!
//! Network delivery is the underlying client's concern, so the default
//! transport only emits the serialized envelope through structured logging.
//! Tests and embedders inject their own implementation.

use async_trait::async_trait;
use serde_json::Value;

use crate::dsn::Dsn;

/// Asynchronous envelope delivery.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one serialized capture envelope.
    async fn send(&self, payload: Value) -> Result<(), TransportError>;
}

/// Transport failures, swallowed by every capture path.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("transport rejected the envelope: {0}")]
    Rejected(String),

    #[error("transport is closed")]
    Closed,
}

/// Default transport: structured-log the envelope for the configured project.
#[derive(Debug, Clone)]
pub struct LogTransport {
    dsn: Dsn,
}

impl LogTransport {
    pub fn new(dsn: Dsn) -> Self {
        Self { dsn }
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, payload: Value) -> Result<(), TransportError> {
        tracing::info!(
            target: "sitebeacon_report::transport",
            project_id = %self.dsn.project_id(),
            host = %self.dsn.host(),
            payload = %payload,
            "capture envelope forwarded"
        );
        Ok(())
    }
}
