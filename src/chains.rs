pub const MAINNET: u64 = 1;
pub const GOERLI: u64 = 5;
pub const OPTIMISM: u64 = 10;
pub const POLYGON: u64 = 137;
pub const BASE: u64 = 8453;
pub const ARBITRUM_ONE: u64 = 42161;

/// Chains where the protected-auction (Dutch limit order) router is live.
const PROTECTED_AUCTION_CHAINS: &[u64] = &[MAINNET, GOERLI];

pub fn is_protected_auction_supported_chain(chain_id: u64) -> bool {
    PROTECTED_AUCTION_CHAINS.contains(&chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mainnet_and_goerli_support_auctions() {
        assert!(is_protected_auction_supported_chain(MAINNET));
        assert!(is_protected_auction_supported_chain(GOERLI));
        for chain in [OPTIMISM, POLYGON, BASE, ARBITRUM_ONE, 0] {
            assert!(!is_protected_auction_supported_chain(chain));
        }
    }
}
