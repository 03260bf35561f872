//! Event envelopes carried to the analytics and error-reporting backends.
//!
//! All envelopes are transient: constructed per occurrence, serialized, and
//! handed to a sink. Nothing here is retained locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single analytics event forwarded through the client handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Unique event id.
    pub id: Uuid,
    /// Event name, e.g. `page_view` or `web_vital`.
    pub name: String,
    /// Free-form event properties.
    pub properties: serde_json::Value,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Build an event stamped with a fresh id and the current time.
    pub fn new(name: impl Into<String>, properties: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            properties,
            timestamp: Utc::now(),
        }
    }
}

/// Navigation state observed on a completed route settle.
///
/// Purely transient: recomputed on every navigation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Route path, e.g. `/docs`.
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
}

impl NavigationState {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Canonical URL for the page-view event.
    ///
    /// The query string is appended with `?` only when non-empty.
    pub fn canonical_url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// The error half of a capture envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedError {
    /// Framework-assigned digest identifying the error instance, when present.
    pub digest: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// Stack trace as rendered by the runtime, when available.
    pub stack: Option<String>,
}

impl CapturedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            digest: None,
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Request context attached to a captured error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub path: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Routing metadata supplied by the hosting framework for a captured error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingMetadata {
    /// Which router produced the route, e.g. `app` or `pages`.
    pub router_kind: String,
    /// Matched route pattern, e.g. `/docs/[slug]`.
    pub route_path: String,
    /// Route flavor, e.g. `render` or `route`.
    pub route_type: String,
    /// Render origin, when the framework distinguishes one.
    pub render_source: Option<String>,
    /// Reason a revalidation was in flight, when applicable.
    pub revalidate_reason: Option<String>,
    /// Render mode, e.g. `dynamic` or `static`.
    pub render_type: Option<String>,
}

/// Complete capture envelope forwarded to the error-reporting client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCaptureEvent {
    pub error: CapturedError,
    pub request: RequestInfo,
    pub routing: RoutingMetadata,
    /// Capture timestamp.
    pub timestamp: DateTime<Utc>,
}

impl ErrorCaptureEvent {
    pub fn new(error: CapturedError, request: RequestInfo, routing: RoutingMetadata) -> Self {
        Self {
            error,
            request,
            routing,
            timestamp: Utc::now(),
        }
    }
}
