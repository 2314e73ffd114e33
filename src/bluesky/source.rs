// Live profile source: assembles a ProfileRecord from the Bluesky API.
//
// One profile costs: a getProfile call, then the author feed, follows,
// followers, and likes fetched concurrently. Likes live on the account's
// PDS, which may be unreachable (did:web hosts, self-hosted servers); a
// failure there leaves the favorites facet empty instead of failing the
// whole comparison.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use super::client::PublicAtpClient;
use super::followers::{fetch_follower_ids, fetch_friend_ids};
use super::identity::did_to_id;
use super::likes::fetch_favorite_texts;
use super::posts::{extract_mentions, fetch_recent_posts};
use super::profiles::fetch_profile;
use crate::profile::ProfileRecord;
use crate::source::{normalize_handle, ProfileSource};

/// Caps on how much history to pull per profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    pub max_posts: usize,
    pub max_favorites: usize,
    pub max_relations: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_posts: 100,
            max_favorites: 100,
            max_relations: 1000,
        }
    }
}

/// Fetches profile records from the public Bluesky API.
///
/// Ids are derived from DIDs, so records fetched in different runs (and
/// saved as snapshots) are comparable.
pub struct BlueskySource {
    client: PublicAtpClient,
    limits: FetchLimits,
}

impl BlueskySource {
    pub fn new(client: PublicAtpClient, limits: FetchLimits) -> Self {
        Self { client, limits }
    }
}

#[async_trait]
impl ProfileSource for BlueskySource {
    async fn fetch(&self, handle: &str) -> Result<ProfileRecord> {
        let handle = normalize_handle(handle);
        let info = fetch_profile(&self.client, handle).await?;
        let id = did_to_id(&info.did);

        let favorites = async {
            match fetch_favorite_texts(&self.client, &info.did, self.limits.max_favorites).await {
                Ok(texts) => Ok::<_, anyhow::Error>(texts),
                Err(e) => {
                    warn!(error = %e, handle = %info.handle, "Could not fetch favorites");
                    Ok(Vec::new())
                }
            }
        };

        let (posts, friends, followers, favorites) = futures::try_join!(
            fetch_recent_posts(&self.client, &info.handle, self.limits.max_posts),
            fetch_friend_ids(&self.client, &info.handle, self.limits.max_relations),
            fetch_follower_ids(&self.client, &info.handle, self.limits.max_relations),
            favorites,
        )?;

        let mut builder = ProfileRecord::builder(info.handle.as_str())
            .id(id)
            .friends(friends)
            .followers(followers)
            .favorites(favorites);

        for post in posts {
            builder = builder.mentions(extract_mentions(&post.text)).post(post.text);
        }
        if let Some(name) = info.display_name {
            builder = builder.display_name(name);
        }
        if let Some(bio) = info.description {
            builder = builder.bio(bio);
        }

        let record = builder.build()?;

        info!(
            handle = record.handle(),
            id = %record.id(),
            posts = record.posts().len(),
            favorites = record.favorites().len(),
            friends = record.friends().len(),
            followers = record.followers().len(),
            "Built profile record"
        );

        Ok(record)
    }
}
