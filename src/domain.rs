use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "EXACT_INPUT")]
    ExactInput,
    #[serde(rename = "EXACT_OUTPUT")]
    ExactOutput,
}

impl TradeType {
    pub fn is_exact_input(self) -> bool {
        matches!(self, TradeType::ExactInput)
    }

    /// Value of the `type` query parameter on the routing API.
    pub fn query_value(self) -> &'static str {
        match self {
            TradeType::ExactInput => "exactIn",
            TradeType::ExactOutput => "exactOut",
        }
    }
}

/// Which routing variants the user (or the app) wants quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterPreference {
    /// Protected-auction routing allowed alongside classic routing.
    #[serde(rename = "uniswapx")]
    X,
    /// Opted out of protected-auction routing.
    Api,
    Client,
    /// Internal sentinel for price-only lookups (no executable quote needed).
    Price,
}

impl RouterPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            RouterPreference::X => "uniswapx",
            RouterPreference::Api => "api",
            RouterPreference::Client => "client",
            RouterPreference::Price => "price",
        }
    }

    pub fn is_price_only(self) -> bool {
        matches!(self, RouterPreference::Price)
    }
}

impl std::str::FromStr for RouterPreference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniswapx" | "x" => Ok(RouterPreference::X),
            "api" => Ok(RouterPreference::Api),
            "client" => Ok(RouterPreference::Client),
            "price" => Ok(RouterPreference::Price),
            other => Err(anyhow::anyhow!("unknown router preference: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteIntent {
    #[serde(rename = "quote")]
    Quote,
    #[serde(rename = "pricing")]
    Pricing,
}

/// One user trade input. Created per input change and consumed by a single
/// pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub account: Option<String>,
    pub token_in_address: String,
    pub token_in_chain_id: u64,
    pub token_out_address: String,
    pub token_out_chain_id: u64,
    /// Amount in base units of the input token (exact input) or output
    /// token (exact output).
    pub amount: String,
    pub trade_type: TradeType,
    pub router_preference: RouterPreference,
    #[serde(default)]
    pub force_synthetic_quotes: bool,
    #[serde(default)]
    pub send_portion_enabled: bool,
    #[serde(default)]
    pub gateway_dns_update_enabled: bool,
}

impl QuoteRequest {
    pub fn intent(&self) -> QuoteIntent {
        if self.router_preference.is_price_only() {
            QuoteIntent::Pricing
        } else {
            QuoteIntent::Quote
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteMethod {
    #[serde(rename = "ROUTING_API")]
    RoutingApi,
    #[serde(rename = "CLIENT_SIDE_FALLBACK")]
    ClientSideFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteState {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    #[serde(rename = "ERROR")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingType {
    #[serde(rename = "CLASSIC")]
    Classic,
    #[serde(rename = "DUTCH_LIMIT")]
    DutchLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub chain_id: u64,
    pub address: String,
}

/// A normalized trade built from either a routing API quote or a local one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicTrade {
    pub method: QuoteMethod,
    pub routing: RoutingType,
    pub token_in: Currency,
    pub token_out: Currency,
    pub trade_type: TradeType,
    pub input_amount: u128,
    pub output_amount: u128,
    pub quote_gas_adjusted: Option<u128>,
    #[serde(rename = "gasUseEstimateUSD")]
    pub gas_use_estimate_usd: Option<f64>,
    pub block_number: Option<u64>,
    pub route_string: Option<String>,
    pub quote_id: Option<String>,
    /// Only populated when portion fees were requested.
    pub portion_amount: Option<u128>,
}

/// Status attached to every terminal fallback failure.
pub const CUSTOM_ERROR: &str = "CUSTOM_ERROR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum QuoteOutcome {
    #[serde(rename = "SUCCESS")]
    Success { trade: ClassicTrade, method: QuoteMethod },
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    #[serde(rename = "ERROR")]
    Error { status: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResult {
    #[serde(flatten)]
    pub outcome: QuoteOutcome,
    pub latency_ms: f64,
}

impl TradeResult {
    pub fn state(&self) -> QuoteState {
        match self.outcome {
            QuoteOutcome::Success { .. } => QuoteState::Success,
            QuoteOutcome::NotFound => QuoteState::NotFound,
            QuoteOutcome::Error { .. } => QuoteState::Error,
        }
    }

    pub fn method(&self) -> Option<QuoteMethod> {
        match &self.outcome {
            QuoteOutcome::Success { method, .. } => Some(*method),
            _ => None,
        }
    }

    pub fn trade(&self) -> Option<&ClassicTrade> {
        match &self.outcome {
            QuoteOutcome::Success { trade, .. } => Some(trade),
            _ => None,
        }
    }
}
