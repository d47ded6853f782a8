pub mod aggregate;
pub mod moon;
pub mod sun;
pub mod types;

use thiserror::Error;

/// Failures of either astronomical provider. Always scoped to a single
/// day's lookup; the aggregator absorbs them into null fields.
#[derive(Error, Debug)]
pub enum AstroError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("provider returned status: {0}")]
    ProviderStatus(String),
    #[error("API error: {0}")]
    ApiError(String),
}
