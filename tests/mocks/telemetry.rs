//! Telemetry sink that remembers what it was told

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use routing_quoter::telemetry::QuoteTelemetry;
use routing_quoter::RouterPreference;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRequest {
    pub chain_id: u64,
    pub preference: RouterPreference,
    pub is_retry: bool,
    /// Routing API hits observed when the request was logged.
    pub remote_hits_before: usize,
}

#[derive(Default)]
pub struct RecordingTelemetry {
    remote_hits: Option<Arc<AtomicUsize>>,
    pub requests: Mutex<Vec<LoggedRequest>>,
    pub events: Mutex<Vec<(String, Value)>>,
}

impl RecordingTelemetry {
    pub fn observing(remote_hits: Arc<AtomicUsize>) -> Self {
        Self {
            remote_hits: Some(remote_hits),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<LoggedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl QuoteTelemetry for RecordingTelemetry {
    fn log_swap_quote_request(&self, chain_id: u64, preference: RouterPreference, is_retry: bool) {
        let remote_hits_before = self
            .remote_hits
            .as_ref()
            .map(|h| h.load(Ordering::SeqCst))
            .unwrap_or(0);
        self.requests.lock().unwrap().push(LoggedRequest {
            chain_id,
            preference,
            is_retry,
            remote_hits_before,
        });
    }

    fn send_analytics_event(&self, name: &str, payload: Value) {
        self.events.lock().unwrap().push((name.to_string(), payload));
    }
}
