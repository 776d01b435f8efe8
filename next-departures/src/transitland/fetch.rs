//! Transport capability.
//!
//! The pipeline only ever needs "fetch this URL, hand me the body";
//! pagination, parsing and throttling are layered on top. Keeping the
//! transport behind a trait lets tests and offline hosts swap in the
//! canned implementation from [`mock`](super::mock).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::TransitError;

/// HTTP GET capability used by the client.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// Implementations map any non-2xx status to [`TransitError::Api`]
    /// carrying the raw response body as the message.
    async fn fetch(&self, url: &str) -> Result<String, TransitError>;
}

/// [`Fetch`] implementation backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    http: reqwest::Client,
}

impl HttpFetch {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, url: &str) -> Result<String, TransitError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
