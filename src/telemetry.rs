use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::RouterPreference;

pub const NO_QUOTE_EVENT: &str = "No quote received from routing API";
pub const SWAP_QUOTE_REQUEST_EVENT: &str = "Swap quote request";

/// Where analytics events go. Tracing spans are emitted separately through
/// `tracing`.
pub trait QuoteTelemetry: Send + Sync {
    fn log_swap_quote_request(&self, chain_id: u64, preference: RouterPreference, is_retry: bool);

    fn send_analytics_event(&self, name: &str, payload: Value);
}

/// Default sink: every event becomes a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl QuoteTelemetry for TracingTelemetry {
    fn log_swap_quote_request(&self, chain_id: u64, preference: RouterPreference, is_retry: bool) {
        info!(chain_id, preference = preference.as_str(), is_retry, "quoter.request");
    }

    fn send_analytics_event(&self, name: &str, payload: Value) {
        info!(event = name, %payload, "quoter.analytics");
    }
}

#[derive(Debug, Serialize)]
struct EventLine<'a> {
    at: DateTime<Utc>,
    event: &'a str,
    payload: Value,
}

/// Appends analytics events as JSON lines to a file, and also logs them.
pub struct JsonlTelemetry {
    path: PathBuf,
    // Serializes appends from concurrent quotes.
    lock: Mutex<()>,
}

impl JsonlTelemetry {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: &str, payload: Value) -> Result<()> {
        let line = serde_json::to_string(&EventLine {
            at: Utc::now(),
            event,
            payload,
        })?;
        let _guard = self.lock.lock().map_err(|_| anyhow::anyhow!("analytics log lock poisoned"))?;
        let mut f = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    fn record(&self, event: &str, payload: Value) {
        if let Err(e) = self.append(event, payload) {
            warn!(error = %e, path = %self.path.display(), "quoter.analytics.write_failed");
        }
    }
}

impl QuoteTelemetry for JsonlTelemetry {
    fn log_swap_quote_request(&self, chain_id: u64, preference: RouterPreference, is_retry: bool) {
        TracingTelemetry.log_swap_quote_request(chain_id, preference, is_retry);
        self.record(
            SWAP_QUOTE_REQUEST_EVENT,
            serde_json::json!({
                "chainId": chain_id,
                "routerPreference": preference,
                "isRetry": is_retry,
            }),
        );
    }

    fn send_analytics_event(&self, name: &str, payload: Value) {
        TracingTelemetry.send_analytics_event(name, payload.clone());
        self.record(name, payload);
    }
}
