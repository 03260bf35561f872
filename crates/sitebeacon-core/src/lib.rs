//! # Sitebeacon Core
//!
//! Core types for the Sitebeacon instrumentation layer: the environment-driven
//! configuration gate, the analytics/error event model, and the sink traits
//! that external client SDKs implement. This crate carries no transport of its
//! own; everything here is data and contracts shared by the other crates.

pub mod config;
pub mod error;
pub mod event;
pub mod identity;
pub mod sink;

pub use config::{AuthBackend, ObservabilityConfig};
pub use error::{DeliveryError, Subsystem};
pub use event::{
    AnalyticsEvent, CapturedError, ErrorCaptureEvent, NavigationState, RequestInfo,
    RoutingMetadata,
};
pub use identity::{InvalidUserId, UserId, UserProfile, UserTraits};
pub use sink::AnalyticsSink;
