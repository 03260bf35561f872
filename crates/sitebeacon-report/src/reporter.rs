//! Error reporter lifecycle and capture hook.
//!
//! Per-process state machine: `Unregistered → Inert` when reporting is not
//! configured, otherwise `Unregistered → Registered(context)`. There is no
//! way back to `Unregistered`; a second registration attempt is a logged
//! no-op surfaced to the registering caller only.

use std::sync::{Arc, OnceLock};

use sitebeacon_core::config::ObservabilityConfig;
use sitebeacon_core::error::Subsystem;
use sitebeacon_core::event::{CapturedError, ErrorCaptureEvent, RequestInfo, RoutingMetadata};

use crate::dsn::Dsn;
use crate::sink::{ErrorSink, ReportError};
use crate::transport::{LogTransport, Transport};
use crate::{RuntimeContext, edge, server};

enum State {
    /// Reporting disabled; no capture hook installed.
    Inert,
    /// Capture hook installed for one runtime context.
    Active {
        context: RuntimeContext,
        sink: Arc<dyn ErrorSink>,
    },
}

/// Result of a successful `register` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// One initialization path ran; the capture hook is live.
    Registered(RuntimeContext),
    /// Reporting is not configured; nothing was installed.
    Inert,
}

/// Registration failures. Never propagated into request handling.
#[derive(thiserror::Error, Debug)]
pub enum RegisterError {
    #[error("error reporter is already registered for this process")]
    AlreadyRegistered,

    #[error("error reporter initialization failed: {0}")]
    Init(#[from] ReportError),
}

/// Process-wide error reporter.
#[derive(Default)]
pub struct ErrorReporter {
    state: OnceLock<State>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the capture hook, once, at process startup.
    ///
    /// With no DSN configured the reporter settles `Inert` and pays no
    /// further cost. A malformed DSN is logged and also settles `Inert`;
    /// configuration is never retried within a process.
    pub async fn register(
        &self,
        config: &ObservabilityConfig,
        context: RuntimeContext,
    ) -> Result<RegisterOutcome, RegisterError> {
        let Some(raw) = config.error_dsn() else {
            return self.settle_inert("error reporting not configured");
        };
        let dsn = match Dsn::parse(raw) {
            Ok(dsn) => dsn,
            Err(err) => {
                tracing::warn!(error = %err, "malformed error-reporting dsn");
                return self.settle_inert("malformed dsn");
            }
        };

        let transport = Arc::new(LogTransport::new(dsn));
        self.register_with_transport(context, transport).await
    }

    /// Register with an injected transport. Dispatches to exactly one of the
    /// two initialization paths for the given context.
    pub async fn register_with_transport(
        &self,
        context: RuntimeContext,
        transport: Arc<dyn Transport>,
    ) -> Result<RegisterOutcome, RegisterError> {
        if self.state.get().is_some() {
            tracing::warn!(context = %context, "duplicate error reporter registration ignored");
            return Err(RegisterError::AlreadyRegistered);
        }

        let sink = match context {
            RuntimeContext::Server => server::init(transport).await?,
            RuntimeContext::Edge => edge::init(transport).await?,
        };

        if self.state.set(State::Active { context, sink }).is_err() {
            tracing::warn!(context = %context, "duplicate error reporter registration ignored");
            return Err(RegisterError::AlreadyRegistered);
        }

        tracing::info!(context = %context, "error reporter registered");
        Ok(RegisterOutcome::Registered(context))
    }

    /// Capture hook handed to the hosting framework.
    ///
    /// Unregistered and inert reporters ignore the call. Failures inside the
    /// capture path are logged and swallowed; nothing escapes into the
    /// request-handling path being observed. Safe to invoke concurrently for
    /// independent requests.
    pub fn on_error(
        &self,
        error: &CapturedError,
        request: &RequestInfo,
        routing: &RoutingMetadata,
    ) {
        let Some(State::Active { sink, .. }) = self.state.get() else {
            return;
        };

        let event = ErrorCaptureEvent::new(error.clone(), request.clone(), routing.clone());
        if let Err(err) = sink.capture(event) {
            tracing::debug!(error = %err, "error capture dropped");
        }
    }

    /// The context this reporter registered for, if any.
    pub fn context(&self) -> Option<RuntimeContext> {
        match self.state.get() {
            Some(State::Active { context, .. }) => Some(*context),
            _ => None,
        }
    }

    /// Whether a capture hook is installed.
    pub fn is_registered(&self) -> bool {
        matches!(self.state.get(), Some(State::Active { .. }))
    }

    fn settle_inert(&self, reason: &str) -> Result<RegisterOutcome, RegisterError> {
        if self.state.set(State::Inert).is_err() {
            return Err(RegisterError::AlreadyRegistered);
        }
        tracing::info!(
            subsystem = %Subsystem::ErrorReporting,
            reason = reason,
            "error reporter inert; capture hook not installed"
        );
        Ok(RegisterOutcome::Inert)
    }
}

impl std::fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state.get() {
            None => "unregistered",
            Some(State::Inert) => "inert",
            Some(State::Active { .. }) => "registered",
        };
        f.debug_struct("ErrorReporter").field("state", &state).finish()
    }
}
