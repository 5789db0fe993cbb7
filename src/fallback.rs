//! Client-side quoting used when the routing API fails unexpectedly.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::QuoteRequest;
use crate::error::FallbackError;
use crate::routing_api::QuoteData;
use crate::routing_config::{Protocol, DEFAULT_PROTOCOLS};

/// Protocol selection handed to the client-side router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    pub protocols: Vec<Protocol>,
}

impl Default for ClientParams {
    fn default() -> Self {
        Self {
            protocols: DEFAULT_PROTOCOLS.to_vec(),
        }
    }
}

impl ClientParams {
    pub fn allows(&self, protocol: Protocol) -> bool {
        self.protocols.contains(&protocol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocalQuoteResult {
    Success(QuoteData),
    NotFound,
}

/// An in-process router bound to one chain.
#[async_trait]
pub trait FallbackQuoteProvider: Send + Sync {
    fn chain_id(&self) -> u64;

    async fn get_client_side_quote(
        &self,
        req: &QuoteRequest,
        params: &ClientParams,
    ) -> Result<LocalQuoteResult, FallbackError>;
}

/// Client-side routers keyed by chain id.
#[derive(Clone, Default)]
pub struct FallbackRouters {
    routers: HashMap<u64, Arc<dyn FallbackQuoteProvider>>,
}

impl FallbackRouters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_router(mut self, router: Arc<dyn FallbackQuoteProvider>) -> Self {
        self.insert(router);
        self
    }

    pub fn insert(&mut self, router: Arc<dyn FallbackQuoteProvider>) {
        self.routers.insert(router.chain_id(), router);
    }

    pub fn router_for(&self, chain_id: u64) -> Result<Arc<dyn FallbackQuoteProvider>, FallbackError> {
        self.routers
            .get(&chain_id)
            .cloned()
            .ok_or(FallbackError::UnsupportedChain(chain_id))
    }

    pub fn chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.routers.keys().copied().collect();
        chains.sort_unstable();
        chains
    }
}
