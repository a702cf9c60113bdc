use thiserror::Error;

/// Errors returned by the marketplace aggregator client and the lookups built
/// on top of it.
#[derive(Debug, Error)]
pub enum KicksError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The aggregator answered with a non-2xx status. `body` is the upstream
    /// JSON payload (or `{"error": <text>}` when the body was not JSON) so it
    /// can be relayed unchanged.
    #[error("upstream returned HTTP {status} for {url}")]
    Upstream {
        status: u16,
        url: String,
        body: serde_json::Value,
    },

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Neither the direct lookup nor the search fallback produced a product.
    #[error("product not found: {id}")]
    NotFound { id: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl KicksError {
    /// Upstream HTTP status, when the failure carried one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            KicksError::Upstream { status, .. } => Some(*status),
            KicksError::Http(e) => e.status().map(|s| s.as_u16()),
            KicksError::NotFound { .. } => Some(404),
            KicksError::Deserialize { .. } | KicksError::InvalidBaseUrl { .. } => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
