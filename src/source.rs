// Profile source trait: where profile records come from.
//
// The comparison commands only need "give me the record for this handle".
// The live implementation talks to Bluesky; the snapshot implementation
// reads JSON files written earlier, which keeps the interactive loop and
// tests off the network.

use anyhow::Result;
use async_trait::async_trait;

use crate::profile::ProfileRecord;

/// Anything that can produce a profile record for a handle.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the full record for `handle`.
    async fn fetch(&self, handle: &str) -> Result<ProfileRecord>;
}

/// Normalize user input into a bare handle: trims whitespace and a leading `@`.
pub fn normalize_handle(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_handle() {
        assert_eq!(normalize_handle("  @alice.bsky.social\n"), "alice.bsky.social");
        assert_eq!(normalize_handle("bob"), "bob");
    }
}
