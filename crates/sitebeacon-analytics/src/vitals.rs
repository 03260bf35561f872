//! Web-vitals collection with per-page-load dedup.
//!
//! The browser performance timeline finalizes each vital differently, so the
//! collector enforces one forwarded event per vital per page load regardless
//! of how many samples the underlying observers deliver.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use sitebeacon_core::event::AnalyticsEvent;

use crate::client::ClientFactory;

/// Event name carried by web-vital events.
pub const WEB_VITAL_EVENT: &str = "web_vital";

/// Standard performance-timeline vitals.
///
/// Finalization semantics differ per vital, which is why the collector
/// suppresses duplicate reports instead of trusting the observers:
///
/// - [`WebVital::Cls`] (layout stability) accumulates over the page's life
///   and only settles at page-hide; observers may report growing values.
/// - [`WebVital::Inp`] (input responsiveness) can be superseded by a worse
///   interaction until page-hide.
/// - [`WebVital::Lcp`] (paint timing) is finalized by the first input or
///   page-hide; candidates may stream in before that.
/// - [`WebVital::Fcp`] and [`WebVital::Ttfb`] (paint/load timing) settle
///   once, shortly after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebVital {
    /// Cumulative Layout Shift.
    Cls,
    /// Interaction to Next Paint.
    Inp,
    /// Largest Contentful Paint.
    Lcp,
    /// First Contentful Paint.
    Fcp,
    /// Time To First Byte.
    Ttfb,
}

impl WebVital {
    /// Metric name as reported to the analytics backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebVital::Cls => "CLS",
            WebVital::Inp => "INP",
            WebVital::Lcp => "LCP",
            WebVital::Fcp => "FCP",
            WebVital::Ttfb => "TTFB",
        }
    }
}

impl fmt::Display for WebVital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forwards each distinct measured vital once per page load.
pub struct WebVitalsCollector {
    factory: Arc<ClientFactory>,
    installed: AtomicBool,
    reported: Mutex<HashSet<WebVital>>,
}

impl WebVitalsCollector {
    pub fn new(factory: Arc<ClientFactory>) -> Self {
        Self {
            factory,
            installed: AtomicBool::new(false),
            reported: Mutex::new(HashSet::new()),
        }
    }

    /// Install the performance observers.
    ///
    /// Idempotent: returns `true` only for the call that actually installed;
    /// a second call within the same page load does not double-register.
    pub fn init(&self) -> bool {
        let first = !self.installed.swap(true, Ordering::SeqCst);
        if first {
            tracing::debug!("web vitals observers installed");
        }
        first
    }

    /// Forward a measured vital.
    ///
    /// Returns `true` when an event was emitted. Suppressed when observers
    /// were never installed, analytics is disabled, or this vital already
    /// reported during the current page load.
    pub fn record(&self, vital: WebVital, value: f64) -> bool {
        if !self.installed.load(Ordering::SeqCst) {
            return false;
        }
        let Some(handle) = self.factory.get() else {
            return false;
        };

        let Ok(mut reported) = self.reported.lock() else {
            tracing::debug!("vitals ledger lock poisoned; dropping sample");
            return false;
        };
        if !reported.insert(vital) {
            return false;
        }

        let event = AnalyticsEvent::new(
            WEB_VITAL_EVENT,
            serde_json::json!({
                "name": vital.as_str(),
                "value": value,
            }),
        );
        if let Err(err) = handle.track(event) {
            tracing::debug!(error = %err, vital = %vital, "web vital delivery failed");
        }
        true
    }

    /// Start a new page load, clearing the per-load ledger.
    pub fn begin_page_load(&self) {
        match self.reported.lock() {
            Ok(mut reported) => reported.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl fmt::Debug for WebVitalsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebVitalsCollector")
            .field("installed", &self.installed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::recording_factory;

    #[test]
    fn test_init_is_idempotent() {
        let (factory, _sink) = recording_factory();
        let collector = WebVitalsCollector::new(factory);

        assert!(collector.init());
        assert!(!collector.init());
    }

    #[test]
    fn test_record_requires_init() {
        let (factory, sink) = recording_factory();
        let collector = WebVitalsCollector::new(factory);

        assert!(!collector.record(WebVital::Lcp, 1830.0));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_one_event_per_vital_per_page_load() {
        let (factory, sink) = recording_factory();
        let collector = WebVitalsCollector::new(factory);
        collector.init();

        // CLS keeps accumulating until page-hide; only the first forwarded
        // sample survives.
        assert!(collector.record(WebVital::Cls, 0.02));
        assert!(!collector.record(WebVital::Cls, 0.09));
        assert!(collector.record(WebVital::Ttfb, 212.0));

        let names: Vec<String> = sink
            .events()
            .iter()
            .map(|event| event.properties["name"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["CLS", "TTFB"]);
    }

    #[test]
    fn test_new_page_load_resets_ledger() {
        let (factory, sink) = recording_factory();
        let collector = WebVitalsCollector::new(factory);
        collector.init();

        assert!(collector.record(WebVital::Fcp, 900.0));
        collector.begin_page_load();
        assert!(collector.record(WebVital::Fcp, 640.0));

        assert_eq!(sink.events().len(), 2);
    }
}
