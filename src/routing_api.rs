use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::{QuoteRequest, RoutingType};
use crate::error::RemoteQuoteError;

/// Error code the routing API uses when no route exists for the pair.
pub const NO_ROUTE_ERROR_CODE: &str = "NO_ROUTE";
/// Detail string some routing API deployments send instead of the code.
pub const NO_QUOTES_DETAIL: &str = "No quotes available";

#[derive(Clone)]
pub struct RoutingApiClient {
    api_url: String,
    gateway_dns_url: String,
    http: Client,
}

impl RoutingApiClient {
    pub fn new(api_url: String, gateway_dns_url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).gzip(true).brotli(true).build()?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            gateway_dns_url: gateway_dns_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.routing_api_url.clone(),
            cfg.routing_gateway_dns_url.clone(),
            cfg.request_timeout,
        )
    }

    fn base_url(&self, req: &QuoteRequest) -> &str {
        if req.gateway_dns_update_enabled {
            &self.gateway_dns_url
        } else {
            &self.api_url
        }
    }

    /// One GET against `/quote`. Never retries.
    ///
    /// Non-2xx answers are decoded into [`RemoteQuoteResponse::ServiceError`];
    /// only transport failures and undecodable 2xx bodies are errors here.
    pub async fn fetch(&self, req: &QuoteRequest) -> Result<RemoteQuoteResponse, RemoteQuoteError> {
        let url = format!("{}/quote", self.base_url(req));
        let resp = self
            .http
            .get(url)
            .query(&QuoteQuery::from(req))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            // Bodies that are not a JSON object carry no usable code/detail.
            let err: ServiceErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            return Ok(RemoteQuoteResponse::ServiceError {
                status: status.as_u16(),
                error_code: err.error_code,
                detail: err.detail,
            });
        }

        let quote: QuoteData =
            serde_json::from_slice(&body).map_err(|e| RemoteQuoteError::Decode(e.to_string()))?;
        Ok(RemoteQuoteResponse::Success(quote))
    }

    pub async fn quote(&self, req: &QuoteRequest) -> Result<RemoteOutcome, RemoteQuoteError> {
        classify(self.fetch(req).await?)
    }
}

/// Splits a decoded response into a usable quote, a "no route" business
/// outcome, or an unclassified failure.
pub fn classify(resp: RemoteQuoteResponse) -> Result<RemoteOutcome, RemoteQuoteError> {
    match resp {
        RemoteQuoteResponse::Success(quote) => Ok(RemoteOutcome::Quote(QuoteResponseEnvelope::classic(quote))),
        RemoteQuoteResponse::ServiceError {
            status,
            error_code,
            detail,
        } => {
            let no_route = error_code.as_deref() == Some(NO_ROUTE_ERROR_CODE)
                || detail.as_deref() == Some(NO_QUOTES_DETAIL);
            if no_route {
                Ok(RemoteOutcome::NoRoute {
                    status,
                    error_code,
                    detail,
                })
            } else {
                Err(RemoteQuoteError::Service {
                    status,
                    error_code,
                    detail,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteQuery<'a> {
    token_in_address: &'a str,
    token_in_chain_id: u64,
    token_out_address: &'a str,
    token_out_chain_id: u64,
    amount: &'a str,
    #[serde(rename = "type")]
    trade_type: &'static str,
}

impl<'a> From<&'a QuoteRequest> for QuoteQuery<'a> {
    fn from(req: &'a QuoteRequest) -> Self {
        Self {
            token_in_address: &req.token_in_address,
            token_in_chain_id: req.token_in_chain_id,
            token_out_address: &req.token_out_address,
            token_out_chain_id: req.token_out_chain_id,
            amount: &req.amount,
            trade_type: req.trade_type.query_value(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceErrorBody {
    error_code: Option<String>,
    detail: Option<String>,
}

/// Classic quote payload, shared by the routing API and the client-side router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    /// Output amount for exact input, input amount for exact output (base units).
    pub quote: String,
    pub amount: Option<String>,
    pub block_number: Option<String>,
    pub quote_gas_adjusted: Option<String>,
    pub gas_use_estimate: Option<String>,
    #[serde(rename = "gasUseEstimateUSD")]
    pub gas_use_estimate_usd: Option<String>,
    pub gas_price_wei: Option<String>,
    pub route_string: Option<String>,
    pub quote_id: Option<String>,
    pub portion_bips: Option<u32>,
    pub portion_amount: Option<String>,

    /// Pool-level route; kept as JSON, nothing downstream inspects it.
    #[serde(default)]
    pub route: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteQuoteResponse {
    Success(QuoteData),
    ServiceError {
        status: u16,
        error_code: Option<String>,
        detail: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponseEnvelope {
    pub quote: QuoteData,
    pub all_quotes: Vec<QuoteData>,
    pub routing: RoutingType,
}

impl QuoteResponseEnvelope {
    pub fn classic(quote: QuoteData) -> Self {
        Self {
            all_quotes: vec![quote.clone()],
            quote,
            routing: RoutingType::Classic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Quote(QuoteResponseEnvelope),
    NoRoute {
        status: u16,
        error_code: Option<String>,
        detail: Option<String>,
    },
}
