//! # Sitebeacon
//!
//! Sitebeacon is a client/server-boundary observability instrumentation
//! layer for web applications. It initializes analytics and error-reporting
//! clients exactly once per process, deduplicates navigation and identity
//! events, collects web-vitals signals once per page load, and routes
//! runtime errors to a reporting backend according to the execution context
//! (full server process or isolated edge runtime).
//!
//! ## Core Components
//!
//! - [`ObservabilityConfig`]: immutable environment snapshot gating each subsystem
//! - [`ClientFactory`]: at-most-once construction of the shared analytics handle
//! - [`IdentityReconciler`]: one `identify`/`reset` per genuine identity transition
//! - [`PageViewTracker`]: one page-view event per distinct navigation
//! - [`WebVitalsCollector`]: one event per vital per page load
//! - [`ErrorReporter`]: context-selected capture hook for runtime errors
//!
//! The layer is strictly observational: total failure inside it must never
//! affect rendering, navigation, or authentication.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sitebeacon::{
//!     AnalyticsEvent, AnalyticsSink, DeliveryError, Instrumentation, NavigationState,
//!     ObservabilityConfig, UserProfile,
//! };
//!
//! struct StdoutSink;
//!
//! impl AnalyticsSink for StdoutSink {
//!     fn identify(&self, _user: &UserProfile) -> Result<(), DeliveryError> {
//!         Ok(())
//!     }
//!     fn reset(&self) -> Result<(), DeliveryError> {
//!         Ok(())
//!     }
//!     fn track(&self, event: AnalyticsEvent) -> Result<(), DeliveryError> {
//!         println!("{} -> {}", event.name, event.properties);
//!         Ok(())
//!     }
//! }
//!
//! let config = ObservabilityConfig::disabled().with_analytics_write_key("wk_demo");
//! let instrumentation =
//!     Instrumentation::new(config, |_key| Ok(Arc::new(StdoutSink) as Arc<dyn AnalyticsSink>));
//!
//! instrumentation
//!     .page_views()
//!     .on_navigation(&NavigationState::new("/docs", "tab=2"));
//! ```

use std::sync::{Arc, OnceLock};

pub use sitebeacon_core::{
    AnalyticsEvent, AnalyticsSink, AuthBackend, CapturedError, DeliveryError, ErrorCaptureEvent,
    NavigationState, ObservabilityConfig, RequestInfo, RoutingMetadata, Subsystem, UserId,
    UserProfile, UserTraits,
};

pub use sitebeacon_analytics::{
    AnalyticsHandle, ClientError, ClientFactory, IdentityReconciler, PAGE_VIEW_EVENT,
    PageViewTracker, Transition, WEB_VITAL_EVENT, WebVital, WebVitalsCollector,
};

pub use sitebeacon_report::{
    Dsn, DsnError, ErrorReporter, ErrorSink, LogTransport, RegisterError, RegisterOutcome,
    ReportError, RuntimeContext, Transport, TransportError,
};

/// Process-wide instrumentation instance.
static INSTANCE: OnceLock<Instrumentation> = OnceLock::new();

/// Assembled instrumentation layer for one process.
///
/// Wires the configuration gate into every component: one singleton client
/// factory shared by identity reconciliation, page-view tracking, and
/// web-vitals collection, plus the runtime-context-aware error reporter.
#[derive(Debug)]
pub struct Instrumentation {
    config: ObservabilityConfig,
    analytics: Arc<ClientFactory>,
    identity: IdentityReconciler,
    page_views: PageViewTracker,
    vitals: WebVitalsCollector,
    reporter: ErrorReporter,
}

impl Instrumentation {
    /// Assemble the layer from a configuration snapshot and the constructor
    /// for the underlying analytics SDK sink.
    pub fn new<F>(config: ObservabilityConfig, constructor: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn AnalyticsSink>, ClientError> + Send + Sync + 'static,
    {
        let analytics = Arc::new(ClientFactory::new(&config, constructor));
        Self {
            identity: IdentityReconciler::new(Arc::clone(&analytics)),
            page_views: PageViewTracker::new(Arc::clone(&analytics)),
            vitals: WebVitalsCollector::new(Arc::clone(&analytics)),
            reporter: ErrorReporter::new(),
            analytics,
            config,
        }
    }

    /// Assemble from the process environment.
    pub fn from_env<F>(constructor: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn AnalyticsSink>, ClientError> + Send + Sync + 'static,
    {
        Self::new(ObservabilityConfig::from_env(), constructor)
    }

    /// Install the process-wide instance.
    ///
    /// Subsequent calls fail with [`InitError::AlreadyInitialized`] and leave
    /// the first instance untouched.
    pub fn initialize<F>(
        config: ObservabilityConfig,
        constructor: F,
    ) -> Result<&'static Self, InitError>
    where
        F: Fn(&str) -> Result<Arc<dyn AnalyticsSink>, ClientError> + Send + Sync + 'static,
    {
        let mut fresh = false;
        let instance = INSTANCE.get_or_init(|| {
            fresh = true;
            Self::new(config, constructor)
        });
        if fresh {
            Ok(instance)
        } else {
            Err(InitError::AlreadyInitialized)
        }
    }

    /// The installed process-wide instance, if any.
    pub fn global() -> Option<&'static Self> {
        INSTANCE.get()
    }

    /// Configuration snapshot this instance was assembled with.
    pub fn config(&self) -> &ObservabilityConfig {
        &self.config
    }

    /// Singleton analytics client factory.
    pub fn analytics(&self) -> &ClientFactory {
        &self.analytics
    }

    /// Identity reconciler fed by the auth-state provider.
    pub fn identity(&self) -> &IdentityReconciler {
        &self.identity
    }

    /// Page-view tracker fed by the routing layer.
    pub fn page_views(&self) -> &PageViewTracker {
        &self.page_views
    }

    /// Web-vitals collector fed by the performance timeline.
    pub fn vitals(&self) -> &WebVitalsCollector {
        &self.vitals
    }

    /// Runtime error reporter.
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Register error reporting for the resolved runtime context.
    pub async fn register_error_reporting(
        &self,
        context: RuntimeContext,
    ) -> Result<RegisterOutcome, RegisterError> {
        self.reporter.register(&self.config, context).await
    }
}

/// Facade initialization errors.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("instrumentation is already initialized for this process")]
    AlreadyInitialized,
}
