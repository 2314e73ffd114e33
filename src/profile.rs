// Profile records: the per-account snapshot that similarity runs over.
//
// A record is assembled once (by a ProfileSource or a test) through
// ProfileBuilder and then treated as read-only. The identity id is a
// non-zero integer and must be set explicitly.
//
// ProfileRecord has no PartialEq/Hash. Identity is compared only through
// `same_identity`.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroU64;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::similarity::metrics::{count_into, FrequencyMap};

/// Unique identity of a profile. Zero is not a valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(NonZeroU64);

impl ProfileId {
    /// Returns `None` for zero.
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the similarity engine knows about one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    id: ProfileId,
    handle: String,
    display_name: Option<String>,
    bio: Option<String>,
    posts: Vec<String>,
    favorites: Vec<String>,
    mentions: FrequencyMap,
    friends: HashSet<u64>,
    followers: HashSet<u64>,
}

impl ProfileRecord {
    /// Start building a record for the given login handle.
    pub fn builder(handle: impl Into<String>) -> ProfileBuilder {
        ProfileBuilder::new(handle)
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// Login handle (e.g. `alice.bsky.social`).
    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn posts(&self) -> &[String] {
        &self.posts
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Raw mentioned handle → number of posts mentioning it.
    pub fn mentions(&self) -> &HashMap<String, u32> {
        &self.mentions
    }

    /// Ids of the accounts this profile follows.
    pub fn friends(&self) -> &HashSet<u64> {
        &self.friends
    }

    /// Ids of the accounts following this profile.
    pub fn followers(&self) -> &HashSet<u64> {
        &self.followers
    }

    /// True if this profile follows `other`, judged from `other`'s follower set.
    pub fn follows(&self, other: &ProfileRecord) -> bool {
        other.followers.contains(&self.id.get())
    }

    /// True if `other` appears in this profile's follower set.
    pub fn is_followed_by(&self, other: &ProfileRecord) -> bool {
        self.followers.contains(&other.id.get())
    }
}

/// Whether two records denote the same account.
pub fn same_identity(a: &ProfileRecord, b: &ProfileRecord) -> bool {
    a.id == b.id
}

/// Incremental builder for [`ProfileRecord`].
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    id: Option<u64>,
    handle: String,
    display_name: Option<String>,
    bio: Option<String>,
    posts: Vec<String>,
    favorites: Vec<String>,
    mentions: FrequencyMap,
    friends: HashSet<u64>,
    followers: HashSet<u64>,
}

impl ProfileBuilder {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn post(mut self, text: impl Into<String>) -> Self {
        self.posts.push(text.into());
        self
    }

    pub fn posts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.posts.extend(texts.into_iter().map(Into::into));
        self
    }

    pub fn favorite(mut self, text: impl Into<String>) -> Self {
        self.favorites.push(text.into());
        self
    }

    pub fn favorites<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorites.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Count one more mention of each handle in `handles`.
    pub fn mentions<I, S>(mut self, handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        count_into(handles, &mut self.mentions);
        self
    }

    pub fn friends<I: IntoIterator<Item = u64>>(mut self, ids: I) -> Self {
        self.friends.extend(ids);
        self
    }

    pub fn followers<I: IntoIterator<Item = u64>>(mut self, ids: I) -> Self {
        self.followers.extend(ids);
        self
    }

    /// Finish the record. Fails if no id was set, or the id is zero.
    pub fn build(self) -> Result<ProfileRecord> {
        let raw = self
            .id
            .with_context(|| format!("Profile @{} has no id", self.handle))?;
        let id = ProfileId::new(raw)
            .with_context(|| format!("Profile @{} has invalid id 0", self.handle))?;

        Ok(ProfileRecord {
            id,
            handle: self.handle,
            display_name: self.display_name,
            bio: self.bio,
            posts: self.posts,
            favorites: self.favorites,
            mentions: self.mentions,
            friends: self.friends,
            followers: self.followers,
        })
    }
}
