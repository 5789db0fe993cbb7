//! Builds the routing configurations sent alongside a quote request.

use serde::{Deserialize, Serialize};

use crate::chains::is_protected_auction_supported_chain;
use crate::domain::{QuoteIntent, QuoteRequest, RouterPreference, TradeType};

/// Liquidity protocols the classic router may combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    V2,
    V3,
    #[serde(rename = "MIXED")]
    Mixed,
}

pub const DEFAULT_PROTOCOLS: [Protocol; 3] = [Protocol::V2, Protocol::V3, Protocol::Mixed];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "routingType")]
pub enum RoutingConfigVariant {
    #[serde(rename = "DUTCH_LIMIT", rename_all = "camelCase")]
    ProtectedAuction {
        use_synthetic_quotes: bool,
        // Swap+send to another address is supported by the protocol, but
        // recipient is always the swapper for now.
        recipient: Option<String>,
        swapper: Option<String>,
    },
    #[serde(rename = "CLASSIC", rename_all = "camelCase")]
    AggregatedLiquidity {
        protocols: Vec<Protocol>,
        // Fees only work on the routing API when this is set.
        enable_universal_router: bool,
        recipient: Option<String>,
        enable_fee_on_transfer_fee_fetching: bool,
    },
}

impl RoutingConfigVariant {
    pub fn is_protected_auction(&self) -> bool {
        matches!(self, RoutingConfigVariant::ProtectedAuction { .. })
    }
}

/// Returns the variants to request, in priority order.
pub fn build_routing_configs(req: &QuoteRequest) -> Vec<RoutingConfigVariant> {
    let classic = RoutingConfigVariant::AggregatedLiquidity {
        protocols: DEFAULT_PROTOCOLS.to_vec(),
        enable_universal_router: true,
        recipient: req.account.clone(),
        enable_fee_on_transfer_fee_fetching: true,
    };

    let classic_only = matches!(
        req.router_preference,
        RouterPreference::Api | RouterPreference::Price
    ) || !is_protected_auction_supported_chain(req.token_in_chain_id);

    if classic_only {
        return vec![classic];
    }

    let auction = RoutingConfigVariant::ProtectedAuction {
        use_synthetic_quotes: req.force_synthetic_quotes,
        recipient: req.account.clone(),
        swapper: req.account.clone(),
    };

    vec![auction, classic]
}

/// Body describing the full quote intent. The routing API is queried with
/// GET parameters; this body travels with analytics events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestBody {
    pub token_in_chain_id: u64,
    pub token_in: String,
    pub token_out_chain_id: u64,
    pub token_out: String,
    pub amount: String,
    pub send_portion_enabled: bool,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub intent: QuoteIntent,
    pub configs: Vec<RoutingConfigVariant>,
}

impl QuoteRequestBody {
    pub fn build(req: &QuoteRequest) -> Self {
        Self {
            token_in_chain_id: req.token_in_chain_id,
            token_in: req.token_in_address.clone(),
            token_out_chain_id: req.token_out_chain_id,
            token_out: req.token_out_address.clone(),
            amount: req.amount.clone(),
            send_portion_enabled: req.send_portion_enabled,
            trade_type: req.trade_type,
            intent: req.intent(),
            configs: build_routing_configs(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{ARBITRUM_ONE, MAINNET, POLYGON};

    fn request(chain_id: u64, pref: RouterPreference) -> QuoteRequest {
        QuoteRequest {
            account: Some("0xabc".into()),
            token_in_address: "0xin".into(),
            token_in_chain_id: chain_id,
            token_out_address: "0xout".into(),
            token_out_chain_id: chain_id,
            amount: "1000".into(),
            trade_type: TradeType::ExactInput,
            router_preference: pref,
            force_synthetic_quotes: true,
            send_portion_enabled: false,
            gateway_dns_update_enabled: false,
        }
    }

    #[test]
    fn price_preference_requests_classic_only() {
        for chain in [MAINNET, POLYGON] {
            let configs = build_routing_configs(&request(chain, RouterPreference::Price));
            assert_eq!(configs.len(), 1);
            assert!(matches!(configs[0], RoutingConfigVariant::AggregatedLiquidity { .. }));
        }
    }

    #[test]
    fn api_preference_opts_out_of_auction() {
        let configs = build_routing_configs(&request(MAINNET, RouterPreference::Api));
        assert_eq!(configs.len(), 1);
        assert!(!configs[0].is_protected_auction());
    }

    #[test]
    fn unsupported_chain_gets_one_variant_for_every_preference() {
        for pref in [
            RouterPreference::X,
            RouterPreference::Api,
            RouterPreference::Client,
            RouterPreference::Price,
        ] {
            let configs = build_routing_configs(&request(ARBITRUM_ONE, pref));
            assert_eq!(configs.len(), 1, "{pref:?}");
            assert!(!configs[0].is_protected_auction());
        }
    }

    #[test]
    fn supported_chain_requests_auction_first() {
        for pref in [RouterPreference::X, RouterPreference::Client] {
            let configs = build_routing_configs(&request(MAINNET, pref));
            assert_eq!(configs.len(), 2);
            assert!(configs[0].is_protected_auction());
            assert!(!configs[1].is_protected_auction());
        }
    }

    #[test]
    fn auction_variant_carries_swapper_and_synthetic_flag() {
        let configs = build_routing_configs(&request(MAINNET, RouterPreference::X));
        assert_eq!(
            configs[0],
            RoutingConfigVariant::ProtectedAuction {
                use_synthetic_quotes: true,
                recipient: Some("0xabc".into()),
                swapper: Some("0xabc".into()),
            }
        );
    }

    #[test]
    fn request_body_serializes_like_the_routing_api_expects() {
        let body = QuoteRequestBody::build(&request(MAINNET, RouterPreference::Price));
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["type"], "EXACT_INPUT");
        assert_eq!(v["intent"], "pricing");
        assert_eq!(v["configs"][0]["routingType"], "CLASSIC");
        assert_eq!(v["configs"][0]["enableUniversalRouter"], true);
        assert_eq!(v["configs"][0]["protocols"], serde_json::json!(["V2", "V3", "MIXED"]));
    }
}
