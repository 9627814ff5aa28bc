//! Shared HTTP plumbing for provider clients.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ProviderError;

/// User agent sent to every upstream. iRail asks clients to identify themselves.
pub(crate) const USER_AGENT: &str = concat!("transport-server/", env!("CARGO_PKG_VERSION"));

/// How much of an error body to keep.
const BODY_EXCERPT_CHARS: usize = 500;

/// Build a client with a bounded per-request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::Setup(e.to_string()))
}

/// Send `request` and decode a 2xx JSON body into `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(url = %response.url(), status = status.as_u16(), "upstream response");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::UpstreamError {
            status: status.as_u16(),
            message: excerpt(&body),
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| ProviderError::MalformedPayload {
        message: e.to_string(),
        body: Some(excerpt(&body)),
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
