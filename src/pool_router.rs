//! Client-side router over a static set of constant-product pools.
//!
//! Considers direct swaps and two-hop swaps through one intermediate token.
//! Legs on the same protocol need that protocol enabled; a route that mixes
//! protocols additionally needs [`Protocol::Mixed`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{QuoteRequest, TradeType};
use crate::error::FallbackError;
use crate::fallback::{ClientParams, FallbackQuoteProvider, LocalQuoteResult};
use crate::routing_api::QuoteData;
use crate::routing_config::Protocol;

const BPS: u128 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub chain_id: u64,
    pub address: String,
    pub protocol: Protocol,
    pub token0: String,
    pub token1: String,
    /// Reserves in base units, as decimal strings.
    pub reserve0: String,
    pub reserve1: String,
    pub fee_bps: u32,
}

#[derive(Debug, Clone)]
struct PoolState {
    address: String,
    protocol: Protocol,
    token0: String,
    token1: String,
    reserve0: u128,
    reserve1: u128,
    fee_bps: u128,
}

impl PoolState {
    fn from_pool(pool: &Pool) -> Result<Self> {
        let fee_bps = u128::from(pool.fee_bps);
        if fee_bps >= BPS {
            anyhow::bail!("pool {} has fee_bps {} >= 10000", pool.address, pool.fee_bps);
        }
        Ok(Self {
            address: pool.address.to_lowercase(),
            protocol: pool.protocol,
            token0: pool.token0.to_lowercase(),
            token1: pool.token1.to_lowercase(),
            reserve0: pool.reserve0.parse()?,
            reserve1: pool.reserve1.parse()?,
            fee_bps,
        })
    }

    fn other(&self, token: &str) -> Option<&str> {
        if self.token0 == token {
            Some(&self.token1)
        } else if self.token1 == token {
            Some(&self.token0)
        } else {
            None
        }
    }

    fn reserves(&self, token_in: &str) -> (u128, u128) {
        if self.token0 == token_in {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }

    /// Output for `amount_in`; `None` for an empty pool or a zero output.
    fn amount_out(&self, token_in: &str, amount_in: u128) -> Result<Option<u128>, FallbackError> {
        let (r_in, r_out) = self.reserves(token_in);
        if r_in == 0 || r_out == 0 {
            return Ok(None);
        }
        let in_with_fee = self.mul(U256::from(amount_in), U256::from(BPS - self.fee_bps))?;
        let numerator = self.mul(in_with_fee, U256::from(r_out))?;
        let denominator = self
            .mul(U256::from(r_in), U256::from(BPS))?
            .checked_add(in_with_fee)
            .ok_or_else(|| self.overflow())?;
        let out = self.narrow(numerator / denominator)?;
        Ok((out > 0).then_some(out))
    }

    /// Input needed for exactly `amount_out`; `None` when the pool can't cover it.
    fn amount_in(&self, token_in: &str, amount_out: u128) -> Result<Option<u128>, FallbackError> {
        let (r_in, r_out) = self.reserves(token_in);
        if r_in == 0 || amount_out >= r_out {
            return Ok(None);
        }
        let numerator = self.mul(self.mul(U256::from(r_in), U256::from(amount_out))?, U256::from(BPS))?;
        let denominator = self.mul(U256::from(r_out - amount_out), U256::from(BPS - self.fee_bps))?;
        let amount_in = self.narrow(numerator / denominator)?;
        amount_in.checked_add(1).map(Some).ok_or_else(|| self.overflow())
    }

    fn mul(&self, a: U256, b: U256) -> Result<U256, FallbackError> {
        a.checked_mul(b).ok_or_else(|| self.overflow())
    }

    fn narrow(&self, value: U256) -> Result<u128, FallbackError> {
        u128::try_from(value).map_err(|_| self.overflow())
    }

    fn overflow(&self) -> FallbackError {
        FallbackError::computation(format!("amount through pool {} overflows u128", self.address))
    }
}

#[derive(Debug, Clone)]
struct Candidate<'a> {
    legs: Vec<(&'a PoolState, String)>,
    quote: u128,
}

#[derive(Debug, Clone)]
pub struct PoolRouter {
    chain_id: u64,
    pools: Vec<PoolState>,
}

impl PoolRouter {
    pub fn new(chain_id: u64, pools: &[Pool]) -> Result<Self> {
        let pools = pools
            .iter()
            .filter(|p| p.chain_id == chain_id)
            .map(PoolState::from_pool)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { chain_id, pools })
    }

    /// Reads a JSON list of pools and builds one router per chain.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<PoolRouter>> {
        let raw = fs::read_to_string(path)?;
        let pools: Vec<Pool> = serde_json::from_str(&raw)?;

        let mut by_chain: BTreeMap<u64, Vec<Pool>> = BTreeMap::new();
        for pool in pools {
            by_chain.entry(pool.chain_id).or_default().push(pool);
        }
        by_chain
            .iter()
            .map(|(chain_id, pools)| PoolRouter::new(*chain_id, pools))
            .collect()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Every route of one or two legs from `token_in` to `token_out`, as
    /// (pool, token entering that pool) pairs.
    fn routes<'a>(
        &'a self,
        token_in: &str,
        token_out: &str,
        params: &ClientParams,
    ) -> Vec<Vec<(&'a PoolState, String)>> {
        let mut routes = Vec::new();

        for first in &self.pools {
            let Some(mid) = first.other(token_in) else {
                continue;
            };

            if mid == token_out {
                if params.allows(first.protocol) {
                    routes.push(vec![(first, token_in.to_string())]);
                }
                continue;
            }

            for second in &self.pools {
                if std::ptr::eq(first, second) || second.other(mid) != Some(token_out) {
                    continue;
                }
                let allowed = if first.protocol == second.protocol {
                    params.allows(first.protocol)
                } else {
                    params.allows(Protocol::Mixed)
                        && params.allows(first.protocol)
                        && params.allows(second.protocol)
                };
                if allowed {
                    routes.push(vec![(first, token_in.to_string()), (second, mid.to_string())]);
                }
            }
        }

        routes
    }

    /// `Ok(None)` when some leg can't fill the trade.
    fn simulate_exact_input<'a>(
        legs: Vec<(&'a PoolState, String)>,
        amount: u128,
    ) -> Result<Option<Candidate<'a>>, FallbackError> {
        let mut current = amount;
        for (pool, token) in &legs {
            match pool.amount_out(token, current)? {
                Some(out) => current = out,
                None => return Ok(None),
            }
        }
        Ok(Some(Candidate { legs, quote: current }))
    }

    fn simulate_exact_output<'a>(
        legs: Vec<(&'a PoolState, String)>,
        amount: u128,
    ) -> Result<Option<Candidate<'a>>, FallbackError> {
        let mut current = amount;
        for (pool, token) in legs.iter().rev() {
            match pool.amount_in(token, current)? {
                Some(needed) => current = needed,
                None => return Ok(None),
            }
        }
        Ok(Some(Candidate { legs, quote: current }))
    }

    fn best_route(
        &self,
        req: &QuoteRequest,
        amount: u128,
        params: &ClientParams,
    ) -> Result<Option<Candidate<'_>>, FallbackError> {
        let token_in = req.token_in_address.to_lowercase();
        let token_out = req.token_out_address.to_lowercase();
        if token_in == token_out {
            return Ok(None);
        }
        let routes = self.routes(&token_in, &token_out, params);

        let mut best: Option<Candidate<'_>> = None;
        for legs in routes {
            let candidate = match req.trade_type {
                TradeType::ExactInput => Self::simulate_exact_input(legs, amount)?,
                TradeType::ExactOutput => Self::simulate_exact_output(legs, amount)?,
            };
            let Some(candidate) = candidate else {
                continue;
            };
            let better = match (&best, req.trade_type) {
                (None, _) => true,
                (Some(b), TradeType::ExactInput) => candidate.quote > b.quote,
                (Some(b), TradeType::ExactOutput) => candidate.quote < b.quote,
            };
            if better {
                best = Some(candidate);
            }
        }
        Ok(best)
    }
}

fn route_string(candidate: &Candidate<'_>, token_out: &str) -> String {
    let mut out = String::new();
    for (i, (pool, token)) in candidate.legs.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("[{:?}] 100.00% = {token}", pool.protocol));
        }
        let next = candidate
            .legs
            .get(i + 1)
            .map(|(_, t)| t.as_str())
            .unwrap_or(token_out);
        out.push_str(&format!(
            " -- {:.2}% [{}] --> {next}",
            pool.fee_bps as f64 / 100.0,
            pool.address
        ));
    }
    out
}

#[async_trait]
impl FallbackQuoteProvider for PoolRouter {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_client_side_quote(
        &self,
        req: &QuoteRequest,
        params: &ClientParams,
    ) -> Result<LocalQuoteResult, FallbackError> {
        let amount: u128 = req
            .amount
            .trim()
            .parse()
            .map_err(|_| FallbackError::InvalidAmount(req.amount.clone()))?;
        if amount == 0 {
            return Err(FallbackError::InvalidAmount(req.amount.clone()));
        }

        // Bridging is not something a single-chain router can quote.
        if req.token_in_chain_id != self.chain_id || req.token_out_chain_id != self.chain_id {
            return Ok(LocalQuoteResult::NotFound);
        }

        let Some(best) = self.best_route(req, amount, params)? else {
            debug!(chain_id = self.chain_id, "pool_router.no_route");
            return Ok(LocalQuoteResult::NotFound);
        };

        let route: Vec<String> = best.legs.iter().map(|(p, _)| p.address.clone()).collect();
        Ok(LocalQuoteResult::Success(QuoteData {
            quote: best.quote.to_string(),
            amount: Some(amount.to_string()),
            block_number: None,
            quote_gas_adjusted: None,
            gas_use_estimate: None,
            gas_use_estimate_usd: None,
            gas_price_wei: None,
            route_string: Some(route_string(&best, &req.token_out_address.to_lowercase())),
            quote_id: None,
            portion_bips: None,
            portion_amount: None,
            route: serde_json::json!(route),
        }))
    }
}
