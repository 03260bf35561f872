//! Lazily-constructed singleton analytics client.
//!
//! The factory owns the only process-wide shared state in the analytics
//! layer: an optional client handle constructed at most once. Construction
//! is not safe to repeat (the underlying SDK opens network sessions), so
//! concurrent first calls are serialized and exactly one constructor run
//! wins. A failed construction is never cached; the next access retries.

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use sitebeacon_core::config::ObservabilityConfig;
use sitebeacon_core::error::{DeliveryError, Subsystem};
use sitebeacon_core::event::AnalyticsEvent;
use sitebeacon_core::identity::UserProfile;
use sitebeacon_core::sink::AnalyticsSink;

/// Constructor for the underlying SDK sink, called with the write key.
pub type SinkConstructor =
    dyn Fn(&str) -> Result<Arc<dyn AnalyticsSink>, ClientError> + Send + Sync;

/// Process-wide handle over the constructed analytics sink.
///
/// Effectively immutable once built; the only interior state is the
/// session-scoped anonymous id, which rotates on `reset`.
pub struct AnalyticsHandle {
    sink: Arc<dyn AnalyticsSink>,
    anonymous_id: Mutex<Uuid>,
}

impl AnalyticsHandle {
    fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            sink,
            anonymous_id: Mutex::new(Uuid::new_v4()),
        }
    }

    /// Anonymous id attached to events until `identify` binds a user.
    ///
    /// Stable for the session; `reset` rotates it.
    pub fn anonymous_id(&self) -> Uuid {
        match self.anonymous_id.lock() {
            Ok(id) => *id,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Bind subsequent events to a known user identity.
    pub fn identify(&self, user: &UserProfile) -> Result<(), DeliveryError> {
        self.sink.identify(user)
    }

    /// Clear the identity binding and rotate the anonymous id.
    pub fn reset(&self) -> Result<(), DeliveryError> {
        let result = self.sink.reset();
        match self.anonymous_id.lock() {
            Ok(mut id) => *id = Uuid::new_v4(),
            Err(poisoned) => *poisoned.into_inner() = Uuid::new_v4(),
        }
        result
    }

    /// Forward an event, stamping it with the session's anonymous id.
    pub fn track(&self, mut event: AnalyticsEvent) -> Result<(), DeliveryError> {
        if let Value::Object(properties) = &mut event.properties {
            properties.insert(
                "anonymous_id".to_string(),
                Value::String(self.anonymous_id().to_string()),
            );
        }
        self.sink.track(event)
    }
}

impl std::fmt::Debug for AnalyticsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsHandle")
            .field("anonymous_id", &self.anonymous_id())
            .finish_non_exhaustive()
    }
}

/// Owner of the singleton handle slot.
pub struct ClientFactory {
    write_key: Option<String>,
    constructor: Box<SinkConstructor>,
    slot: OnceCell<Arc<AnalyticsHandle>>,
}

impl ClientFactory {
    /// Build a factory gated by the configuration snapshot.
    ///
    /// The constructor runs at most once per process, on the first access
    /// that finds the subsystem enabled.
    pub fn new<F>(config: &ObservabilityConfig, constructor: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn AnalyticsSink>, ClientError> + Send + Sync + 'static,
    {
        Self {
            write_key: config.analytics_write_key().map(str::to_string),
            constructor: Box::new(constructor),
            slot: OnceCell::new(),
        }
    }

    /// The shared client handle, or `None` when analytics is disabled or
    /// construction failed for this attempt.
    ///
    /// Disabled configuration produces no side effects at all. A
    /// construction failure is logged and retried on the next call.
    pub fn get(&self) -> Option<Arc<AnalyticsHandle>> {
        match self.try_get() {
            Ok(handle) => Some(handle),
            Err(ClientError::NotConfigured) => None,
            Err(err) => {
                tracing::warn!(
                    subsystem = %Subsystem::Analytics,
                    error = %err,
                    "analytics client unavailable for this attempt"
                );
                None
            }
        }
    }

    /// Like [`ClientFactory::get`], surfacing the failure reason.
    pub fn try_get(&self) -> Result<Arc<AnalyticsHandle>, ClientError> {
        let write_key = self
            .write_key
            .as_deref()
            .ok_or(ClientError::NotConfigured)?;

        self.slot
            .get_or_try_init(|| {
                let sink = (self.constructor)(write_key)?;
                tracing::info!("analytics client constructed");
                Ok(Arc::new(AnalyticsHandle::new(sink)))
            })
            .cloned()
    }

    /// Whether the singleton has been constructed.
    pub fn is_constructed(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl std::fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFactory")
            .field("enabled", &self.write_key.is_some())
            .field("constructed", &self.is_constructed())
            .finish_non_exhaustive()
    }
}

/// Analytics client lifecycle errors.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("analytics is not configured for this process")]
    NotConfigured,

    #[error("analytics client construction failed: {0}")]
    Construction(String),
}
