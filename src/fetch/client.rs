use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes one HTTP request.
///
/// The pipeline never builds its own [`reqwest::Client`]; callers hand in
/// whatever transport they want, and tests hand in a canned one.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
