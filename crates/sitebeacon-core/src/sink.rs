//! Sink trait implemented by the underlying analytics SDK.
//!
//! The wire protocol is the SDK's concern; this layer only routes events. A
//! sink call may fail, and every caller in the instrumentation layer is
//! required to swallow that failure rather than surface it into the
//! application path being observed.

use crate::error::DeliveryError;
use crate::event::AnalyticsEvent;
use crate::identity::UserProfile;

/// Outbound surface of the analytics client.
///
/// Implementations must be safe to share across logical threads; the handle
/// wrapping a sink is a process-wide singleton.
pub trait AnalyticsSink: Send + Sync {
    /// Bind subsequent events to a known user identity.
    fn identify(&self, user: &UserProfile) -> Result<(), DeliveryError>;

    /// Clear the identity binding.
    fn reset(&self) -> Result<(), DeliveryError>;

    /// Forward a single event.
    fn track(&self, event: AnalyticsEvent) -> Result<(), DeliveryError>;
}
