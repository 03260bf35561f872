//! # Sitebeacon Analytics
//!
//! Client-side analytics instrumentation: the lazily-constructed singleton
//! client handle, identity reconciliation against the auth-state provider,
//! page-view tracking with navigation dedup, and per-page-load web-vitals
//! collection.
//!
//! All emission paths share one rule: a disabled or failed analytics client
//! degrades every component to a silent no-op. Nothing here may block or
//! fail the navigation, rendering, or authentication it observes.

pub mod client;
pub mod pageview;
pub mod reconcile;
pub mod vitals;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{AnalyticsHandle, ClientError, ClientFactory};
pub use pageview::{PAGE_VIEW_EVENT, PageViewTracker};
pub use reconcile::{IdentityReconciler, Transition};
pub use vitals::{WEB_VITAL_EVENT, WebVital, WebVitalsCollector};
