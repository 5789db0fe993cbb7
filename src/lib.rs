pub mod cache;
pub mod chains;
pub mod config;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod monitoring;
pub mod normalize;
pub mod pool_router;
pub mod quoter;
pub mod routing_api;
pub mod routing_config;
pub mod telemetry;

pub use cache::CachedQuoter;
pub use domain::{QuoteMethod, QuoteRequest, QuoteState, RouterPreference, TradeResult, TradeType};
pub use quoter::Quoter;
