//! Recording sinks for tests.
//!
//! Mirrors what the production SDK would observe without any wire protocol:
//! every call is appended to an in-memory log that assertions read back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sitebeacon_core::config::ObservabilityConfig;
use sitebeacon_core::error::DeliveryError;
use sitebeacon_core::event::AnalyticsEvent;
use sitebeacon_core::identity::UserProfile;
use sitebeacon_core::sink::AnalyticsSink;

use crate::client::ClientFactory;

/// One observed sink call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `identify` with the user id.
    Identify(String),
    /// `reset`.
    Reset,
    /// `track` with the event name.
    Track(String),
}

/// Analytics sink that records every call for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    events: Mutex<Vec<AnalyticsEvent>>,
    fail_next: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next sink call fail with a rejection.
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All calls observed so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// All tracked events observed so far.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().expect("events lock").clone()
    }

    fn deliver(&self, call: SinkCall) -> Result<(), DeliveryError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DeliveryError::Rejected("injected failure".to_string()));
        }
        self.calls.lock().expect("calls lock").push(call);
        Ok(())
    }
}

impl AnalyticsSink for RecordingSink {
    fn identify(&self, user: &UserProfile) -> Result<(), DeliveryError> {
        self.deliver(SinkCall::Identify(user.id.as_str().to_string()))
    }

    fn reset(&self) -> Result<(), DeliveryError> {
        self.deliver(SinkCall::Reset)
    }

    fn track(&self, event: AnalyticsEvent) -> Result<(), DeliveryError> {
        self.deliver(SinkCall::Track(event.name.clone()))?;
        self.events.lock().expect("events lock").push(event);
        Ok(())
    }
}

/// Enabled factory wired to a shared [`RecordingSink`].
pub fn recording_factory() -> (Arc<ClientFactory>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let shared = Arc::clone(&sink);
    let config = ObservabilityConfig::disabled().with_analytics_write_key("wk_test");
    let factory = Arc::new(ClientFactory::new(&config, move |_| {
        Ok(Arc::clone(&shared) as Arc<dyn AnalyticsSink>)
    }));
    (factory, sink)
}
