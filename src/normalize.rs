//! Turns quote payloads from either path into [`TradeResult`]s.

use std::time::Instant;

use crate::domain::{
    ClassicTrade, Currency, QuoteMethod, QuoteOutcome, QuoteRequest, RoutingType, TradeResult,
    CUSTOM_ERROR,
};
use crate::error::TransformError;
use crate::routing_api::QuoteData;

/// Wall-clock latency of one pipeline run. Started once before the remote
/// attempt and read once at finalisation; the fallback does not restart it.
#[derive(Debug, Clone, Copy)]
pub struct LatencyTimer {
    started: Instant,
}

impl LatencyTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

fn parse_amount(field: &'static str, value: &str) -> Result<u128, TransformError> {
    value.trim().parse::<u128>().map_err(|_| TransformError::InvalidAmount {
        field,
        value: value.to_string(),
    })
}

fn parse_optional_amount(field: &'static str, value: Option<&str>) -> Result<Option<u128>, TransformError> {
    value.map(|v| parse_amount(field, v)).transpose()
}

pub fn transform_quote_to_trade(
    req: &QuoteRequest,
    quote: &QuoteData,
    method: QuoteMethod,
) -> Result<ClassicTrade, TransformError> {
    let requested = parse_amount("request", &req.amount)?;
    let quoted = parse_amount("quote", &quote.quote)?;

    let (input_amount, output_amount) = if req.trade_type.is_exact_input() {
        (requested, quoted)
    } else {
        (quoted, requested)
    };

    let portion_amount = if req.send_portion_enabled {
        parse_optional_amount("portion", quote.portion_amount.as_deref())?
    } else {
        None
    };

    Ok(ClassicTrade {
        method,
        routing: RoutingType::Classic,
        token_in: Currency {
            chain_id: req.token_in_chain_id,
            address: req.token_in_address.clone(),
        },
        token_out: Currency {
            chain_id: req.token_out_chain_id,
            address: req.token_out_address.clone(),
        },
        trade_type: req.trade_type,
        input_amount,
        output_amount,
        quote_gas_adjusted: parse_optional_amount("quoteGasAdjusted", quote.quote_gas_adjusted.as_deref())?,
        // Informational; an unparsable estimate is dropped rather than failing the trade.
        gas_use_estimate_usd: quote
            .gas_use_estimate_usd
            .as_deref()
            .and_then(|v| v.parse::<f64>().ok()),
        block_number: quote.block_number.as_deref().and_then(|v| v.parse::<u64>().ok()),
        route_string: quote.route_string.clone(),
        quote_id: quote.quote_id.clone(),
        portion_amount,
    })
}

pub fn success(trade: ClassicTrade, timer: &LatencyTimer) -> TradeResult {
    TradeResult {
        outcome: QuoteOutcome::Success {
            method: trade.method,
            trade,
        },
        latency_ms: timer.elapsed_ms(),
    }
}

pub fn not_found(timer: &LatencyTimer) -> TradeResult {
    TradeResult {
        outcome: QuoteOutcome::NotFound,
        latency_ms: timer.elapsed_ms(),
    }
}

pub fn error(message: String, timer: &LatencyTimer) -> TradeResult {
    TradeResult {
        outcome: QuoteOutcome::Error {
            status: CUSTOM_ERROR.to_string(),
            message,
        },
        latency_ms: timer.elapsed_ms(),
    }
}
