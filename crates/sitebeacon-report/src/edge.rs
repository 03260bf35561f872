//! Edge-runtime initialization path.
//!
//! Edge isolates are short-lived and must not own long-lived workers, so
//! this path delivers each envelope from its own task. If the isolate
//! terminates before a delivery task completes, the envelope is dropped;
//! the client holds no per-request resources, so nothing needs cleanup.

use std::sync::Arc;

use sitebeacon_core::event::ErrorCaptureEvent;

use crate::RuntimeContext;
use crate::sink::{ErrorSink, ReportError};
use crate::transport::Transport;

pub(crate) struct EdgeSink {
    transport: Arc<dyn Transport>,
}

/// Initialize the edge capture path.
pub(crate) async fn init(transport: Arc<dyn Transport>) -> Result<Arc<dyn ErrorSink>, ReportError> {
    tracing::info!("edge capture path initialized");
    Ok(Arc::new(EdgeSink { transport }))
}

impl ErrorSink for EdgeSink {
    fn capture(&self, event: ErrorCaptureEvent) -> Result<(), ReportError> {
        let payload = serde_json::to_value(&event)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ReportError::NoRuntime)?;

        let transport = Arc::clone(&self.transport);
        runtime.spawn(async move {
            if let Err(err) = transport.send(payload).await {
                tracing::debug!(error = %err, "capture delivery failed");
            }
        });
        Ok(())
    }

    fn context(&self) -> RuntimeContext {
        RuntimeContext::Edge
    }
}
