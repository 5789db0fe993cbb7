use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::{field, info, info_span, warn, Instrument, Span};

use crate::config::Config;
use crate::domain::{ClassicTrade, QuoteMethod, QuoteRequest, RouterPreference, TradeResult};
use crate::error::{FallbackError, RemoteQuoteError};
use crate::fallback::{ClientParams, FallbackQuoteProvider, FallbackRouters, LocalQuoteResult};
use crate::normalize::{self, transform_quote_to_trade, LatencyTimer};
use crate::pool_router::PoolRouter;
use crate::routing_api::{RemoteOutcome, RoutingApiClient};
use crate::routing_config::QuoteRequestBody;
use crate::telemetry::{JsonlTelemetry, QuoteTelemetry, TracingTelemetry, NO_QUOTE_EVENT};

/// Runs one quote request through the routing API and, when that fails
/// unexpectedly, the client-side router for the input chain.
#[derive(Clone)]
pub struct Quoter {
    remote: RoutingApiClient,
    fallback: FallbackRouters,
    telemetry: Arc<dyn QuoteTelemetry>,
    client_params: ClientParams,
}

impl Quoter {
    pub fn new(remote: RoutingApiClient, fallback: FallbackRouters, telemetry: Arc<dyn QuoteTelemetry>) -> Self {
        Self {
            remote,
            fallback,
            telemetry,
            client_params: ClientParams::default(),
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let remote = RoutingApiClient::from_config(cfg)?;

        let mut fallback = FallbackRouters::new();
        if let Some(path) = cfg.pools_path.as_deref() {
            for router in PoolRouter::load_all(path)? {
                info!(chain_id = router.chain_id(), pools = router.pool_count(), "quoter.fallback.router");
                fallback.insert(Arc::new(router));
            }
        }

        let telemetry: Arc<dyn QuoteTelemetry> = match cfg.analytics_log_path.as_deref() {
            Some(path) => Arc::new(JsonlTelemetry::new(path)),
            None => Arc::new(TracingTelemetry),
        };

        Ok(Self::new(remote, fallback, telemetry))
    }

    pub async fn get_quote(&self, req: &QuoteRequest) -> TradeResult {
        self.telemetry
            .log_swap_quote_request(req.token_in_chain_id, req.router_preference, false);

        let span = info_span!(
            "quote",
            chain_id = req.token_in_chain_id,
            preference = req.router_preference.as_str(),
            is_price = req.router_preference.is_price_only(),
            is_auto_router = req.router_preference == RouterPreference::Api,
            status = field::Empty,
            error = field::Empty,
        );
        self.run(req, &span).instrument(span.clone()).await
    }

    async fn run(&self, req: &QuoteRequest, span: &Span) -> TradeResult {
        let timer = LatencyTimer::start();

        match self.attempt_remote(req).await {
            Ok(Some(trade)) => return normalize::success(trade, &timer),
            Ok(None) => return normalize::not_found(&timer),
            Err(e) => {
                if let Some(status) = e.status() {
                    span.record("status", status);
                }
                span.record("error", field::display(&e));
                warn!(error = %e, "GetQuote failed on routing API, falling back to client");
            }
        }

        match self.attempt_fallback(req).await {
            Ok(Some(trade)) => normalize::success(trade, &timer),
            Ok(None) => normalize::not_found(&timer),
            Err(e) => {
                span.record("error", field::display(&e));
                warn!(error = %e, "GetQuote failed on client");
                normalize::error(e.user_message(), &timer)
            }
        }
    }

    /// `Ok(None)` is the routing API's "no route" answer.
    async fn attempt_remote(&self, req: &QuoteRequest) -> Result<Option<ClassicTrade>, RemoteQuoteError> {
        match self.remote.quote(req).await? {
            RemoteOutcome::Quote(envelope) => {
                let trade = transform_quote_to_trade(req, &envelope.quote, QuoteMethod::RoutingApi)?;
                Ok(Some(trade))
            }
            RemoteOutcome::NoRoute {
                status,
                error_code,
                detail,
            } => {
                self.telemetry.send_analytics_event(
                    NO_QUOTE_EVENT,
                    json!({
                        "requestBody": QuoteRequestBody::build(req),
                        "response": {
                            "status": status,
                            "errorCode": error_code,
                            "detail": detail,
                        },
                        "routerPreference": req.router_preference,
                    }),
                );
                Ok(None)
            }
        }
    }

    async fn attempt_fallback(&self, req: &QuoteRequest) -> Result<Option<ClassicTrade>, FallbackError> {
        let router = self.fallback.router_for(req.token_in_chain_id)?;
        match router.get_client_side_quote(req, &self.client_params).await? {
            LocalQuoteResult::Success(quote) => {
                let trade = transform_quote_to_trade(req, &quote, QuoteMethod::ClientSideFallback)?;
                Ok(Some(trade))
            }
            LocalQuoteResult::NotFound => Ok(None),
        }
    }
}
