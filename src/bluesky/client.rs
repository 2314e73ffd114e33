// Public AT Protocol client: unauthenticated XRPC over HTTP.
//
// Every read the similarity pipeline needs (profiles, feeds, follow graph,
// like records) is served by public endpoints, so no session is required.
// Requests go through a shared RateLimiter and are retried with backoff
// when the server answers 429.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::rate_limit::{with_retry, RateLimiter};

/// Default public API endpoint for AT Protocol read operations.
pub const DEFAULT_PUBLIC_API_URL: &str = "https://public.api.bsky.app";

/// Unauthenticated HTTP client for public AT Protocol XRPC endpoints.
pub struct PublicAtpClient {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl PublicAtpClient {
    /// Create a client for `base_url` with its own default rate limiter.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_rate_limiter(base_url, Arc::new(RateLimiter::bluesky_default()))
    }

    /// Create a client that shares `rate_limiter` with other clients.
    ///
    /// Used when a second client talks to a user's PDS during the same run.
    pub fn with_rate_limiter(base_url: &str, rate_limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("affinity/0.1 (profile-similarity)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.rate_limiter)
    }

    /// GET an XRPC endpoint and deserialize the response, retrying on 429.
    ///
    /// `nsid` is the XRPC method name (e.g. "app.bsky.feed.getAuthorFeed").
    /// Use repeated keys in `params` for array parameters.
    pub async fn xrpc_get<T: DeserializeOwned>(
        &self,
        nsid: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        with_retry(&self.rate_limiter, || self.xrpc_get_once(nsid, params)).await
    }

    async fn xrpc_get_once<T: DeserializeOwned>(
        &self,
        nsid: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/xrpc/{}", self.base_url, nsid);

        debug!(nsid = nsid, "XRPC GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("XRPC request failed: {nsid}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", describe_failure(nsid, status, &body));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {nsid} response"))
    }

    /// Look up the PDS service endpoint for a DID via the PLC directory.
    ///
    /// Like records live in the user's own repo, which is hosted on their
    /// PDS rather than the AppView.
    pub async fn resolve_pds_url(&self, did: &str) -> Result<String> {
        let url = format!("https://plc.directory/{did}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch DID document for {did}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("PLC directory returned {status} for {did}");
        }

        let doc: DidDocument = response
            .json()
            .await
            .context("Failed to parse DID document")?;

        doc.service
            .iter()
            .find(|s| s.id == "#atproto_pds")
            .map(|s| s.service_endpoint.clone())
            .ok_or_else(|| anyhow::anyhow!("No PDS service found in DID document for {did}"))
    }
}

/// Turn a failed XRPC status into a message a person can act on.
///
/// The 429 text is kept in the message so `with_retry` recognizes it.
pub fn describe_failure(nsid: &str, status: StatusCode, body: &str) -> String {
    let reason = match status.as_u16() {
        404 => "account does not exist".to_string(),
        400 if body.contains("not found") || body.contains("NotFound") => {
            "account does not exist".to_string()
        }
        401 => "missing or invalid authorization".to_string(),
        403 => "request not allowed".to_string(),
        429 => "rate limit exceeded (429), try again later".to_string(),
        500..=599 => "Bluesky server error, try again later".to_string(),
        _ if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        _ => body.to_string(),
    };
    format!("XRPC {nsid} returned {status}: {reason}")
}

// -- Serde types for identity resolution --

#[derive(Deserialize)]
struct DidDocument {
    service: Vec<DidService>,
}

#[derive(Deserialize)]
struct DidService {
    id: String,
    #[serde(rename = "serviceEndpoint")]
    service_endpoint: String,
}

// -- Serde types for com.atproto.repo.listRecords --

/// Response from `com.atproto.repo.listRecords`.
#[derive(Debug, Deserialize)]
pub struct ListRecordsResponse {
    pub records: Vec<RepoRecord>,
    pub cursor: Option<String>,
}

/// A single record from a repo listing.
#[derive(Debug, Deserialize)]
pub struct RepoRecord {
    pub uri: String,
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_not_found() {
        let msg = describe_failure(
            "app.bsky.actor.getProfile",
            StatusCode::BAD_REQUEST,
            r#"{"error":"InvalidRequest","message":"Profile not found"}"#,
        );
        assert!(msg.contains("account does not exist"), "{msg}");
    }

    #[test]
    fn test_describe_404_without_body() {
        for body in ["", "<html><body>Not Found</body></html>"] {
            let msg = describe_failure("app.bsky.actor.getProfile", StatusCode::NOT_FOUND, body);
            assert!(msg.ends_with("account does not exist"), "{msg}");
        }
    }

    #[test]
    fn test_describe_empty_body_uses_status_reason() {
        let msg = describe_failure("x", StatusCode::BAD_REQUEST, "");
        assert!(msg.ends_with("Bad Request"), "{msg}");
    }

    #[test]
    fn test_describe_rate_limit_keeps_status_code() {
        let msg = describe_failure("x", StatusCode::TOO_MANY_REQUESTS, "");
        assert!(msg.contains("429"));
    }

    #[test]
    fn test_describe_server_error() {
        let msg = describe_failure("x", StatusCode::BAD_GATEWAY, "<html>");
        assert!(msg.contains("server error"));
    }

    #[test]
    fn test_describe_other_status_passes_body_through() {
        let msg = describe_failure("x", StatusCode::CONFLICT, "conflict body");
        assert!(msg.ends_with("conflict body"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = PublicAtpClient::new("https://example.com/").unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }
}
