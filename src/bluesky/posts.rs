// Post fetching: author feeds, posts by URI, and mention extraction.
//
// A profile's own posts feed the "posts" facet; the handles they mention
// feed the "mentions" facet. Liked posts are fetched by URI in batches
// (see likes.rs) and decoded the same way.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use atrium_api::app::bsky::feed::defs::PostView;
use atrium_api::app::bsky::feed::{get_author_feed, get_posts};
use atrium_api::types::TryFromUnknown;
use regex_lite::Regex;
use tracing::{debug, info};

use super::client::PublicAtpClient;

/// `app.bsky.feed.getPosts` accepts at most 25 URIs per call.
const GET_POSTS_BATCH: usize = 25;

/// A simplified post: just the fields similarity needs.
#[derive(Debug, Clone)]
pub struct Post {
    pub uri: String,
    pub text: String,
}

/// Fetch recent posts for a given account, handling pagination automatically.
///
/// Posts are returned newest-first. Reposts of other accounts' posts are
/// skipped, as are posts with no text (images, bare links).
pub async fn fetch_recent_posts(
    client: &PublicAtpClient,
    handle: &str,
    max_posts: usize,
) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    let mut cursor: Option<String> = None;

    if max_posts == 0 {
        return Ok(posts);
    }

    // API max is 100 per page
    let page_size = max_posts.min(100).to_string();

    loop {
        let mut params: Vec<(&str, &str)> = vec![
            ("actor", handle),
            ("filter", "posts_with_replies"),
            ("limit", &page_size),
        ];
        if let Some(ref c) = cursor {
            params.push(("cursor", c));
        }

        let output: get_author_feed::Output = client
            .xrpc_get("app.bsky.feed.getAuthorFeed", &params)
            .await
            .with_context(|| format!("Failed to fetch feed for @{}", handle))?;

        for feed_item in &output.feed {
            if feed_item.reason.is_some() {
                continue;
            }

            let Some(text) = post_text(&feed_item.post) else {
                continue;
            };

            posts.push(Post {
                uri: feed_item.post.uri.clone(),
                text,
            });

            if posts.len() >= max_posts {
                break;
            }
        }

        debug!(
            page_posts = output.feed.len(),
            total_collected = posts.len(),
            "Fetched page of posts for @{}",
            handle
        );

        if posts.len() >= max_posts {
            break;
        }

        cursor = output.data.cursor.clone();
        if cursor.is_none() || output.feed.is_empty() {
            break;
        }
    }

    info!(count = posts.len(), handle = handle, "Collected posts");

    Ok(posts)
}

/// Fetch the text of many posts by AT URI.
///
/// Deleted or undecodable posts are skipped, so the result may be shorter
/// than `uris`.
pub async fn fetch_post_texts(client: &PublicAtpClient, uris: &[String]) -> Result<Vec<String>> {
    let mut texts = Vec::with_capacity(uris.len());

    for chunk in uris.chunks(GET_POSTS_BATCH) {
        let params: Vec<(&str, &str)> = chunk.iter().map(|uri| ("uris", uri.as_str())).collect();

        let output: get_posts::Output = client
            .xrpc_get("app.bsky.feed.getPosts", &params)
            .await
            .context("Failed to fetch posts by URI")?;

        texts.extend(output.posts.iter().filter_map(post_text));
    }

    Ok(texts)
}

/// Decode a post view's record and return its text, if non-empty.
fn post_text(post_view: &PostView) -> Option<String> {
    // The record is an untyped IPLD value; decode it into the typed
    // post::Record to reach the text.
    atrium_api::app::bsky::feed::post::Record::try_from_unknown(post_view.record.clone())
        .ok()
        .map(|record| record.data.text.clone())
        .filter(|text| !text.trim().is_empty())
}

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // A mention starts at the beginning or after a non-word character,
        // so e-mail addresses don't count.
        Regex::new(r"(?:^|[^\w@])@([A-Za-z0-9][A-Za-z0-9.\-]*)")
            .expect("mention pattern is valid")
    })
}

/// Extract raw mentioned handles (without the `@`) from post text.
///
/// Handles are returned as written; trailing sentence punctuation is trimmed.
pub fn extract_mentions(text: &str) -> Vec<String> {
    mention_pattern()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['.', '-']).to_string())
        .filter(|handle| !handle.is_empty())
        .collect()
}
