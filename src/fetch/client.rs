use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes HTTP requests for remote grade sheets.
///
/// Kept as a trait so a download can go through a wrapper (proxy, auth,
/// recording client) without touching the loader.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
