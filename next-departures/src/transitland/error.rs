//! Transit.land client error types.

/// Errors from the transit.land datastore client.
///
/// "Nothing matched" is not represented here: resolution functions return
/// `Ok(None)` when the API answered but no candidate fit, so callers can
/// tell an empty outcome from a transport failure.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status; the message is the raw body
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON shape we expect
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Fetched data that cannot be interpreted (unknown timezone, ...)
    #[error("bad response data: {0}")]
    Data(String),
}
