use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::bluesky::client::DEFAULT_PUBLIC_API_URL;
use crate::bluesky::source::FetchLimits;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public AT Protocol API endpoint (defaults to https://public.api.bsky.app).
    pub public_api_url: String,
    /// Stopword file (one word per line). Unset means the built-in English list.
    pub stopwords_path: Option<PathBuf>,
    /// How much history to pull per profile
    pub limits: FetchLimits,
    /// Where `snapshot` writes profile JSON files
    pub snapshot_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = FetchLimits::default();

        Ok(Self {
            public_api_url: env::var("PUBLIC_API_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_API_URL.to_string()),
            stopwords_path: env::var("AFFINITY_STOPWORDS").ok().map(PathBuf::from),
            limits: FetchLimits {
                max_posts: env_usize("AFFINITY_MAX_POSTS", defaults.max_posts)?,
                max_favorites: env_usize("AFFINITY_MAX_FAVORITES", defaults.max_favorites)?,
                max_relations: env_usize("AFFINITY_MAX_RELATIONS", defaults.max_relations)?,
            },
            snapshot_dir: env::var("AFFINITY_SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_snapshot_dir()),
        })
    }
}

/// `<data dir>/affinity/snapshots`, or `./snapshots` if the platform has no data dir.
pub fn default_snapshot_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("affinity").join("snapshots"))
        .unwrap_or_else(|| PathBuf::from("snapshots"))
}

fn env_usize(name: &str, default: usize) -> Result<usize> {
    match env::var(name) {
        Ok(raw) => parse_usize(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usize_accepts_padding() {
        assert_eq!(parse_usize("X", " 42 ").unwrap(), 42);
    }

    #[test]
    fn test_parse_usize_error_names_variable() {
        let err = parse_usize("AFFINITY_MAX_POSTS", "lots").unwrap_err();
        assert!(err.to_string().contains("AFFINITY_MAX_POSTS"));
    }

    #[test]
    fn test_default_snapshot_dir_ends_in_snapshots() {
        assert!(default_snapshot_dir().ends_with("snapshots"));
    }
}
