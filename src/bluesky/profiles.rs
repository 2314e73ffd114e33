// Profile lookup: handle to DID, display name, and bio.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::client::PublicAtpClient;

/// The profile fields the similarity engine needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInfo {
    pub did: String,
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// Fetch a profile by handle (or DID) via `app.bsky.actor.getProfile`.
pub async fn fetch_profile(client: &PublicAtpClient, actor: &str) -> Result<ProfileInfo> {
    let profile: ProfileInfo = client
        .xrpc_get("app.bsky.actor.getProfile", &[("actor", actor)])
        .await
        .with_context(|| format!("Could not obtain information for @{actor}"))?;

    debug!(handle = %profile.handle, did = %profile.did, "Fetched profile");

    Ok(profile)
}
