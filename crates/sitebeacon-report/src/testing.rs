//! Counting transports for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::transport::{Transport, TransportError};

/// Transport that records every delivered envelope.
#[derive(Debug, Default)]
pub struct CountingTransport {
    sends: Mutex<Vec<Value>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delivery fail.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Envelopes delivered successfully, in order.
    pub fn sends(&self) -> Vec<Value> {
        self.sends.lock().expect("sends lock").clone()
    }

    /// Total delivery attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` delivery attempts happened.
    ///
    /// Deliveries are asynchronous; tests use this instead of sleeping.
    pub async fn wait_for(&self, count: usize) {
        while self.attempts() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn send(&self, payload: Value) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            return Err(TransportError::Rejected("injected failure".to_string()));
        }
        self.sends.lock().expect("sends lock").push(payload);
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
