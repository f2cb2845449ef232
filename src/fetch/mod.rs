//! HTTP plumbing for the upstream API.
//!
//! [`HttpClient`] abstracts the transport so tests can inject canned
//! responses; [`ApiKey`] layers the `X-API-Key` header over any client.

mod basic;
mod client;
pub mod auth;

pub use auth::ApiKey;
pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::{Method, Request, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// Upper bound on one request, including the body read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues one GET and returns the response body.
///
/// A non-200 status is a [`FetchError::Transport`] carrying the status code
/// and body text; no retry happens here.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> Result<Vec<u8>, FetchError> {
    let mut req = Request::new(Method::GET, url);
    *req.timeout_mut() = Some(REQUEST_TIMEOUT);

    let resp = client.execute(req).await?;

    let status = resp.status();
    if status != StatusCode::OK {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Transport {
            status: Some(status.as_u16()),
            reason: body,
        });
    }

    let bytes = resp.bytes().await.map_err(FetchError::from)?;
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes.to_vec())
}
