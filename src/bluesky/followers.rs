// Follow graph fetching with pagination.
//
// "Friends" are the accounts a profile follows (getFollows); "followers"
// are the accounts following it (getFollowers). Both come back as DIDs,
// which are mapped to their stable integer ids.

use anyhow::{Context, Result};
use atrium_api::app::bsky::graph::{get_followers, get_follows};
use tracing::{debug, info};

use super::client::PublicAtpClient;
use super::identity::dids_to_ids;

/// Fetch the ids of accounts following `handle`, up to `max`.
pub async fn fetch_follower_ids(
    client: &PublicAtpClient,
    handle: &str,
    max: usize,
) -> Result<Vec<u64>> {
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;

    while ids.len() < max {
        let params = page_params(handle, cursor.as_deref());
        let output: get_followers::Output = client
            .xrpc_get("app.bsky.graph.getFollowers", &params)
            .await
            .with_context(|| format!("Failed to fetch followers for @{}", handle))?;

        let remaining = max - ids.len();
        ids.extend(dids_to_ids(
            output.followers.iter().take(remaining).map(|p| p.did.as_str()),
        ));

        debug!(
            page_size = output.followers.len(),
            total = ids.len(),
            "Fetched page of followers for @{}",
            handle
        );

        cursor = output.data.cursor.clone();
        if cursor.is_none() || output.followers.is_empty() {
            break;
        }
    }

    info!(count = ids.len(), handle = handle, "Collected followers");

    Ok(ids)
}

/// Fetch the ids of accounts `handle` follows, up to `max`.
pub async fn fetch_friend_ids(
    client: &PublicAtpClient,
    handle: &str,
    max: usize,
) -> Result<Vec<u64>> {
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;

    while ids.len() < max {
        let params = page_params(handle, cursor.as_deref());
        let output: get_follows::Output = client
            .xrpc_get("app.bsky.graph.getFollows", &params)
            .await
            .with_context(|| format!("Failed to fetch follows for @{}", handle))?;

        let remaining = max - ids.len();
        ids.extend(dids_to_ids(
            output.follows.iter().take(remaining).map(|p| p.did.as_str()),
        ));

        debug!(
            page_size = output.follows.len(),
            total = ids.len(),
            "Fetched page of follows for @{}",
            handle
        );

        cursor = output.data.cursor.clone();
        if cursor.is_none() || output.follows.is_empty() {
            break;
        }
    }

    info!(count = ids.len(), handle = handle, "Collected follows");

    Ok(ids)
}

fn page_params<'a>(handle: &'a str, cursor: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
    let mut params = vec![("actor", handle), ("limit", "100")];
    if let Some(c) = cursor {
        params.push(("cursor", c));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_without_cursor() {
        assert_eq!(
            page_params("alice.bsky.social", None),
            vec![("actor", "alice.bsky.social"), ("limit", "100")]
        );
    }

    #[test]
    fn test_page_params_with_cursor() {
        let params = page_params("alice.bsky.social", Some("abc"));
        assert_eq!(params.last(), Some(&("cursor", "abc")));
    }
}
