//! Canned transport for tests and offline development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::TransitError;
use super::fetch::Fetch;

/// [`Fetch`](super::Fetch) implementation serving registered bodies by
/// exact URL.
///
/// Unregistered URLs answer 404 with a JSON error body, the same way the
/// datastore reports unknown routes. Requested URLs are recorded in order
/// so tests can assert on request counts and on what was never fetched.
#[derive(Debug, Default)]
pub struct MockFetch {
    routes: Mutex<HashMap<String, Result<String, (u16, String)>>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a JSON value for `url`.
    pub fn serve(&self, url: impl Into<String>, body: &serde_json::Value) {
        self.serve_raw(url, body.to_string());
    }

    /// Serve a raw body for `url`.
    pub fn serve_raw(&self, url: impl Into<String>, body: impl Into<String>) {
        self.routes
            .lock()
            .expect("route table poisoned")
            .insert(url.into(), Ok(body.into()));
    }

    /// Answer `url` with a failure status and raw body.
    pub fn serve_error(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .expect("route table poisoned")
            .insert(url.into(), Err((status, body.into())));
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

#[async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, url: &str) -> Result<String, TransitError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(url.to_string());
        let routes = self.routes.lock().expect("route table poisoned");
        match routes.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((status, body))) => Err(TransitError::Api {
                status: *status,
                message: body.clone(),
            }),
            None => Err(TransitError::Api {
                status: 404,
                message: format!(r#"{{"message":"No route matches GET {url}"}}"#),
            }),
        }
    }
}
