//! Lazy pagination over `meta.next` links.
//!
//! Pages are pulled on demand: the next request is only issued when the
//! consumer polls past the current page, and dropping the stream stops the
//! crawl entirely: a consumer that takes one result never paginates in
//! the background. A failed fetch or parse ends the stream with that
//! error; pages already yielded stand.

use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;

use super::client::TransitClient;
use super::error::TransitError;

/// A single response page: a named entity array plus pagination metadata.
pub trait Page: DeserializeOwned + Send + 'static {
    type Entity: Send + 'static;

    /// Fully-qualified URL of the next page, when the server declares one.
    fn next_url(&self) -> Option<&str>;

    /// The page's entities, in server order.
    fn into_entities(self) -> Vec<Self::Entity>;
}

impl TransitClient {
    /// Fetch and parse one page, passing through the shared rate limiter.
    pub(crate) async fn fetch_page<P: Page>(&self, url: &str) -> Result<P, TransitError> {
        self.limiter.acquire().await;
        let body = self.fetch.fetch(url).await?;
        serde_json::from_str(&body).map_err(|e| TransitError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Stream of pages starting at `url`, following `meta.next` until
    /// the server stops declaring one.
    pub fn pages<P: Page>(&self, url: String) -> BoxStream<'static, Result<P, TransitError>> {
        let client = self.clone();
        stream::try_unfold(Some(url), move |state| {
            let client = client.clone();
            async move {
                let Some(url) = state else { return Ok(None) };
                let page: P = client.fetch_page(&url).await?;
                let next = page.next_url().map(str::to_owned);
                Ok(Some((page, next)))
            }
        })
        .boxed()
    }

    /// Stream of entities across all pages, in page order.
    pub fn entities<P: Page>(
        &self,
        url: String,
    ) -> BoxStream<'static, Result<P::Entity, TransitError>> {
        self.pages::<P>(url)
            .map_ok(|page| stream::iter(page.into_entities().into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }
}
