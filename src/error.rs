//! Error types for the quote pipeline

use thiserror::Error;

/// Unclassified failures of the routing API path. Every variant triggers the
/// client-side fallback.
#[derive(Debug, Error)]
pub enum RemoteQuoteError {
    #[error("routing API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("routing API returned {status}: {}", service_detail(.error_code, .detail))]
    Service {
        status: u16,
        error_code: Option<String>,
        detail: Option<String>,
    },

    #[error("malformed routing API response: {0}")]
    Decode(String),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl RemoteQuoteError {
    /// HTTP status when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteQuoteError::Transport(e) => e.status().map(|s| s.as_u16()),
            RemoteQuoteError::Service { status, .. } => Some(*status),
            RemoteQuoteError::Decode(_) | RemoteQuoteError::Transform(_) => None,
        }
    }
}

fn service_detail(error_code: &Option<String>, detail: &Option<String>) -> String {
    detail
        .as_deref()
        .or(error_code.as_deref())
        .unwrap_or("no detail")
        .to_string()
}

/// Failures of the in-process fallback. These end the pipeline.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("no client-side router for chain {0}")]
    UnsupportedChain(u64),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("client-side routing failed: {message}")]
    Computation {
        message: String,
        detail: Option<String>,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl FallbackError {
    pub fn computation<T: ToString>(msg: T) -> Self {
        Self::Computation {
            message: msg.to_string(),
            detail: None,
        }
    }

    /// Best available description: the detail when present, else the message.
    pub fn user_message(&self) -> String {
        match self {
            FallbackError::Computation {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Raised when a quote payload cannot be turned into a trade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("invalid {field} amount: {value:?}")]
    InvalidAmount { field: &'static str, value: String },
}
