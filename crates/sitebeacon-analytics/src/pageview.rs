//! Page-view tracking with navigation dedup.
//!
//! One page-view event per completed navigation, keyed by the `(path, query)`
//! pair. Repeated renders of an unchanged route emit nothing. The tracker
//! holds no navigation state captured at construction, which makes it safe to
//! activate late (inside a deferred rendering boundary): whenever the host
//! first calls in, it passes the navigation state that is current at that
//! moment, never a stale snapshot.

use std::sync::{Arc, Mutex};

use sitebeacon_core::event::{AnalyticsEvent, NavigationState};

use crate::client::ClientFactory;

/// Event name carried by page-view events.
pub const PAGE_VIEW_EVENT: &str = "page_view";

/// Observes route settles and emits deduplicated page-view events.
pub struct PageViewTracker {
    factory: Arc<ClientFactory>,
    last_navigation: Mutex<Option<NavigationState>>,
}

impl PageViewTracker {
    pub fn new(factory: Arc<ClientFactory>) -> Self {
        Self {
            factory,
            last_navigation: Mutex::new(None),
        }
    }

    /// Record a completed navigation.
    ///
    /// Returns `true` when a page-view event was emitted. Disabled analytics
    /// and repeats of the previous `(path, query)` pair return `false`.
    pub fn on_navigation(&self, navigation: &NavigationState) -> bool {
        let Some(handle) = self.factory.get() else {
            return false;
        };

        let Ok(mut last) = self.last_navigation.lock() else {
            tracing::debug!("navigation state lock poisoned; skipping page view");
            return false;
        };

        if last.as_ref() == Some(navigation) {
            return false;
        }

        let url = navigation.canonical_url();
        let event = AnalyticsEvent::new(
            PAGE_VIEW_EVENT,
            serde_json::json!({
                "url": url,
                "path": navigation.path,
                "query": navigation.query,
            }),
        );
        if let Err(err) = handle.track(event) {
            tracing::debug!(error = %err, url = %url, "page view delivery failed");
        }

        *last = Some(navigation.clone());
        true
    }

    /// The last navigation that produced an event, if any.
    pub fn last_navigation(&self) -> Option<NavigationState> {
        match self.last_navigation.lock() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl std::fmt::Debug for PageViewTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageViewTracker")
            .field("last_navigation", &self.last_navigation())
            .finish_non_exhaustive()
    }
}
