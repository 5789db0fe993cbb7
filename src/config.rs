use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    // Routing API
    pub routing_api_url: String,
    pub routing_gateway_dns_url: String,
    pub request_timeout: Duration,

    // Client-side fallback
    pub pools_path: Option<String>,

    // Observability
    pub analytics_log_path: Option<String>,
    pub log_format: LogFormat,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` is this over the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| non_empty(lookup(key));

        // Routing API: both endpoints are mandatory.
        let (routing_api_url, routing_gateway_dns_url) =
            match (var("ROUTING_API_URL"), var("ROUTING_GATEWAY_DNS_URL")) {
                (Some(api), Some(gateway)) => (api, gateway),
                _ => {
                    return Err(anyhow!(
                        "ROUTING_API_URL and ROUTING_GATEWAY_DNS_URL must be defined environment variables"
                    ))
                }
            };

        let timeout_ms = match var("ROUTING_REQUEST_TIMEOUT_MS") {
            None => 10_000,
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow!("ROUTING_REQUEST_TIMEOUT_MS must be an integer, got {raw:?}"))?,
        };
        if timeout_ms == 0 {
            return Err(anyhow!("ROUTING_REQUEST_TIMEOUT_MS cannot be 0"));
        }

        let pools_path = var("QUOTER_POOLS_PATH");
        let analytics_log_path = var("QUOTER_ANALYTICS_LOG");

        let log_format = match var("QUOTER_LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
            None | Some("pretty") | Some("text") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(anyhow!("unknown QUOTER_LOG_FORMAT: {other}")),
        };

        Ok(Self {
            routing_api_url,
            routing_gateway_dns_url,
            request_timeout: Duration::from_millis(timeout_ms),
            pools_path,
            analytics_log_path,
            log_format,
        })
    }
}
