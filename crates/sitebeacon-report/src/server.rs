//! Server-runtime initialization path.
//!
//! A full server process can own background tasks, so this path sets up a
//! bounded queue drained by one delivery worker. `capture` enqueues without
//! blocking; when the queue is full the envelope is dropped and the caller
//! sees `QueueFull`, which every call site swallows.

use std::sync::Arc;
use tokio::sync::mpsc;

use sitebeacon_core::event::ErrorCaptureEvent;

use crate::RuntimeContext;
use crate::sink::{ErrorSink, ReportError};
use crate::transport::Transport;

/// Maximum in-flight envelopes before captures are dropped.
const QUEUE_DEPTH: usize = 128;

pub(crate) struct ServerSink {
    queue: mpsc::Sender<ErrorCaptureEvent>,
}

/// Initialize the server capture path: spawn the delivery worker and hand
/// back the enqueueing sink.
pub(crate) async fn init(transport: Arc<dyn Transport>) -> Result<Arc<dyn ErrorSink>, ReportError> {
    let (queue, mut events) = mpsc::channel::<ErrorCaptureEvent>(QUEUE_DEPTH);

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_value(&event) {
                Ok(payload) => {
                    if let Err(err) = transport.send(payload).await {
                        tracing::debug!(error = %err, "capture delivery failed");
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "capture envelope serialization failed");
                }
            }
        }
    });

    tracing::info!(queue_depth = QUEUE_DEPTH, "server capture path initialized");
    Ok(Arc::new(ServerSink { queue }))
}

impl ErrorSink for ServerSink {
    fn capture(&self, event: ErrorCaptureEvent) -> Result<(), ReportError> {
        self.queue.try_send(event).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => ReportError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ReportError::QueueClosed,
        })
    }

    fn context(&self) -> RuntimeContext {
        RuntimeContext::Server
    }
}
