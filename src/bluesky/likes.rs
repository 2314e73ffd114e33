// Favorite (liked) posts.
//
// The AppView only lists likes for the authenticated viewer, so we read the
// account's own like records straight from its PDS repo
// (com.atproto.repo.listRecords on app.bsky.feed.like), then fetch the
// liked posts' text from the AppView by URI.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::client::{ListRecordsResponse, PublicAtpClient};
use super::posts::fetch_post_texts;

/// The value of an `app.bsky.feed.like` record.
#[derive(Debug, Deserialize)]
pub struct LikeRecordValue {
    pub subject: StrongRef,
}

/// A reference to another record by URI.
#[derive(Debug, Deserialize)]
pub struct StrongRef {
    pub uri: String,
}

/// List the URIs of posts `did` has liked, most recent first, up to `max`.
pub async fn fetch_liked_uris(
    pds_client: &PublicAtpClient,
    did: &str,
    max: usize,
) -> Result<Vec<String>> {
    let mut uris = Vec::new();
    let mut cursor: Option<String> = None;

    while uris.len() < max {
        let mut params: Vec<(&str, &str)> = vec![
            ("repo", did),
            ("collection", "app.bsky.feed.like"),
            ("limit", "100"),
            ("reverse", "true"),
        ];
        if let Some(ref c) = cursor {
            params.push(("cursor", c));
        }

        let page: ListRecordsResponse = pds_client
            .xrpc_get("com.atproto.repo.listRecords", &params)
            .await
            .with_context(|| format!("Failed to list like records for {did}"))?;

        uris.extend(
            page.records
                .iter()
                .filter_map(|r| serde_json::from_value::<LikeRecordValue>(r.value.clone()).ok())
                .map(|like| like.subject.uri)
                .take(max - uris.len()),
        );

        debug!(
            page_size = page.records.len(),
            total = uris.len(),
            "Fetched page of like records for {}",
            did
        );

        cursor = page.cursor;
        if cursor.is_none() || page.records.is_empty() {
            break;
        }
    }

    Ok(uris)
}

/// Fetch the text of up to `max` posts liked by `did`.
///
/// Resolves the account's PDS first; the PDS client shares the AppView
/// client's rate limiter.
pub async fn fetch_favorite_texts(
    client: &PublicAtpClient,
    did: &str,
    max: usize,
) -> Result<Vec<String>> {
    if max == 0 {
        return Ok(Vec::new());
    }

    let pds_url = client.resolve_pds_url(did).await?;
    let pds_client = PublicAtpClient::with_rate_limiter(&pds_url, client.rate_limiter())?;

    let uris = fetch_liked_uris(&pds_client, did, max).await?;
    let texts = fetch_post_texts(client, &uris).await?;

    info!(
        likes = uris.len(),
        texts = texts.len(),
        did = did,
        "Collected favorite posts"
    );

    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_record_parses_subject() {
        let value = serde_json::json!({
            "$type": "app.bsky.feed.like",
            "subject": {"uri": "at://did:plc:x/app.bsky.feed.post/1", "cid": "bafy"},
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let like: LikeRecordValue = serde_json::from_value(value).unwrap();
        assert_eq!(like.subject.uri, "at://did:plc:x/app.bsky.feed.post/1");
    }
}
