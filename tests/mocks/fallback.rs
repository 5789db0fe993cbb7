//! Scripted client-side router

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use routing_quoter::error::FallbackError;
use routing_quoter::fallback::{ClientParams, FallbackQuoteProvider, LocalQuoteResult};
use routing_quoter::routing_api::QuoteData;
use routing_quoter::QuoteRequest;

#[derive(Debug, Clone)]
pub enum Script {
    Quote(String),
    NotFound,
    Fail {
        message: String,
        detail: Option<String>,
    },
}

pub struct ScriptedFallback {
    chain_id: u64,
    script: Script,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFallback {
    pub fn new(chain_id: u64, script: Script) -> Self {
        Self {
            chain_id,
            script,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

pub fn local_quote(amount: &str) -> QuoteData {
    serde_json::from_value(serde_json::json!({
        "quote": amount,
        "routeString": "[V2] 100.00% = IN -- 0.30% [0xpool] --> OUT",
    }))
    .expect("quote data")
}

#[async_trait]
impl FallbackQuoteProvider for ScriptedFallback {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_client_side_quote(
        &self,
        _req: &QuoteRequest,
        params: &ClientParams,
    ) -> Result<LocalQuoteResult, FallbackError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(params, &ClientParams::default());
        match &self.script {
            Script::Quote(amount) => Ok(LocalQuoteResult::Success(local_quote(amount))),
            Script::NotFound => Ok(LocalQuoteResult::NotFound),
            Script::Fail { message, detail } => Err(FallbackError::Computation {
                message: message.clone(),
                detail: detail.clone(),
            }),
        }
    }
}
