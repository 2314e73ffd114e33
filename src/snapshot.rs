// Profile snapshots: JSON copies of fetched profile records.
//
// Saving a record lets later comparisons run offline and keeps test
// fixtures honest. Snapshots hold the raw profile only; computed scores
// are never stored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::ProfileRecord;
use crate::source::{normalize_handle, ProfileSource};

/// A profile record plus when it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub profile: ProfileRecord,
}

impl Snapshot {
    pub fn now(profile: ProfileRecord) -> Self {
        Self {
            fetched_at: Utc::now(),
            profile,
        }
    }
}

/// The snapshot path for `handle` inside `dir`.
///
/// Handles that could name a file outside `dir` are rejected.
pub fn snapshot_path(dir: &Path, handle: &str) -> Result<PathBuf> {
    let handle = normalize_handle(handle);
    if handle.is_empty()
        || handle.contains(['/', '\\'])
        || handle.contains("..")
        || handle.starts_with('.')
    {
        anyhow::bail!("Invalid handle for a snapshot: {handle:?}");
    }
    Ok(dir.join(format!("{handle}.json")))
}

/// Write `snapshot` to `<dir>/<handle>.json`, creating `dir` if needed.
pub fn save_snapshot(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;

    let path = snapshot_path(dir, snapshot.profile.handle())?;
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;

    debug!(path = %path.display(), "Saved snapshot");
    Ok(path)
}

/// Read a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Snapshot {} is not a valid profile record", path.display()))
}

/// Serves profiles from a directory of snapshot files.
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ProfileSource for SnapshotSource {
    async fn fetch(&self, handle: &str) -> Result<ProfileRecord> {
        let path = snapshot_path(&self.dir, handle)?;
        if !path.exists() {
            anyhow::bail!(
                "No snapshot for @{} in {}",
                normalize_handle(handle),
                self.dir.display()
            );
        }
        Ok(load_snapshot(&path)?.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProfileRecord {
        ProfileRecord::builder("alice.bsky.social")
            .id(3)
            .bio("rust, coffee, and cats")
            .post("hello @bob")
            .mentions(["bob"])
            .followers([1, 2])
            .build()
            .unwrap()
    }

    #[test]
    fn test_save_then_load_keeps_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_snapshot(dir.path(), &Snapshot::now(sample())).unwrap();
        assert!(path.ends_with("alice.bsky.social.json"));

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.profile.id().get(), 3);
        assert_eq!(loaded.profile.bio(), Some("rust, coffee, and cats"));
        assert_eq!(loaded.profile.mentions()["bob"], 1);
        assert_eq!(loaded.profile.followers().len(), 2);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_snapshot(&path).is_err());
    }

    #[tokio::test]
    async fn test_source_strips_at_sign() {
        let dir = tempfile::tempdir().unwrap();
        save_snapshot(dir.path(), &Snapshot::now(sample())).unwrap();

        let source = SnapshotSource::new(dir.path());
        let profile = source.fetch("@alice.bsky.social").await.unwrap();
        assert_eq!(profile.handle(), "alice.bsky.social");
    }

    #[test]
    fn test_snapshot_path_rejects_escaping_handles() {
        let dir = Path::new("/tmp/snaps");
        for handle in ["../../etc/passwd", "a/b", "a\\b", "..", "@../x", ".hidden", ""] {
            assert!(snapshot_path(dir, handle).is_err(), "{handle:?} accepted");
        }
        assert_eq!(
            snapshot_path(dir, "@alice.bsky.social").unwrap(),
            dir.join("alice.bsky.social.json")
        );
    }

    #[tokio::test]
    async fn test_source_refuses_path_outside_dir() {
        let root = tempfile::tempdir().unwrap();
        let inner = root.path().join("snaps");
        save_snapshot(root.path(), &Snapshot::now(sample())).unwrap();

        let source = SnapshotSource::new(&inner);
        let err = source.fetch("../alice.bsky.social").await.unwrap_err();
        assert!(err.to_string().contains("Invalid handle"), "{err:#}");
    }

    #[tokio::test]
    async fn test_source_missing_handle() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(dir.path());
        let err = source.fetch("nobody").await.unwrap_err();
        assert!(err.to_string().contains("No snapshot for @nobody"));
    }
}
