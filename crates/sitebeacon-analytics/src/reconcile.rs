//! Identity reconciliation against the auth-state provider.
//!
//! The reconciler turns a stream of identity observations into the minimal
//! sequence of `identify`/`reset` calls: one event per genuine transition,
//! nothing for repeated observations of the same state. Re-renders routinely
//! replay the current identity, so the guard against duplicate `identify`
//! calls is load-bearing, not cosmetic.

use std::sync::{Arc, Mutex};

use sitebeacon_core::identity::{UserId, UserProfile};

use crate::client::ClientFactory;

/// Outcome of a single identity observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new identity was bound with `identify`.
    Identified,
    /// The previous identity was cleared with `reset`.
    Reset,
    /// The observation matched the last reconciled state; nothing emitted.
    Unchanged,
}

/// Maps auth-state changes onto analytics identity calls.
pub struct IdentityReconciler {
    factory: Arc<ClientFactory>,
    last_reconciled: Mutex<Option<UserId>>,
}

impl IdentityReconciler {
    pub fn new(factory: Arc<ClientFactory>) -> Self {
        Self {
            factory,
            last_reconciled: Mutex::new(None),
        }
    }

    /// Reconcile one identity observation.
    ///
    /// Disabled analytics makes this a no-op. Delivery failures are logged
    /// and swallowed; the transition is still recorded so the event count
    /// stays one-per-transition, never one-per-observation.
    pub fn observe(&self, profile: Option<&UserProfile>) -> Transition {
        let Some(handle) = self.factory.get() else {
            return Transition::Unchanged;
        };

        let Ok(mut last) = self.last_reconciled.lock() else {
            tracing::debug!("identity state lock poisoned; skipping reconciliation");
            return Transition::Unchanged;
        };

        let previous = last.clone();
        match (profile, previous) {
            (Some(user), Some(previous)) if user.id == previous => Transition::Unchanged,
            (Some(user), _) => {
                if let Err(err) = handle.identify(user) {
                    tracing::debug!(error = %err, user = %user.id, "identify delivery failed");
                }
                *last = Some(user.id.clone());
                Transition::Identified
            }
            (None, Some(previous)) => {
                if let Err(err) = handle.reset() {
                    tracing::debug!(error = %err, user = %previous, "reset delivery failed");
                }
                *last = None;
                Transition::Reset
            }
            (None, None) => Transition::Unchanged,
        }
    }

    /// Identity recorded by the last genuine transition, if any.
    pub fn last_reconciled(&self) -> Option<UserId> {
        match self.last_reconciled.lock() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl std::fmt::Debug for IdentityReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityReconciler")
            .field("last_reconciled", &self.last_reconciled())
            .finish_non_exhaustive()
    }
}
