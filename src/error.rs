use thiserror::Error;

/// Everything that can go wrong during a single lookup.
///
/// A title that simply isn't in the catalog is not an error; that case
/// is reported as [`crate::lookup::LookupOutcome::NotFound`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("field '{0}' is not present on the matched movie")]
    UnknownField(String),

    #[error("client is not configured: {0}")]
    NotConfigured(String),
}
