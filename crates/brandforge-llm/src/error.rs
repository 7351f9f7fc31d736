//! Error types for brandforge-llm

use crate::catalog::Modality;
use thiserror::Error;

/// Routing core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid catalog or router configuration (fatal at startup)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Provider name is not in the catalog
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// No provider with credentials is available for the modality
    #[error("no available {0} provider")]
    NoneAvailable(Modality),

    /// Primary attempt and the single fallback attempt both failed
    #[error("all providers exhausted (primary: {primary}, fallback: {}): {source}", fallback.as_deref().unwrap_or("none"))]
    ProviderExhausted {
        /// Provider chosen by the selector
        primary: String,
        /// Provider tried after the primary failed, if any
        fallback: Option<String>,
        /// Last vendor failure observed
        #[source]
        source: VendorError,
    },

    /// Request was cancelled by the caller
    #[error("generation cancelled")]
    Cancelled,
}

/// Normalised failure of a single vendor call.
///
/// Adapters in [`crate::providers`] map every vendor SDK or HTTP failure into
/// one of these variants so the dispatcher never inspects vendor specifics.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum VendorError {
    /// Provider has no client or credentials
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx HTTP status
    #[error("api error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Sanitised vendor message
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimit,

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Call exceeded its time budget
    #[error("timeout after {0}ms")]
    Timeout(u64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
