// DID to integer id mapping.
//
// Bluesky identifies accounts by DID strings, while the similarity engine
// works on integer ids. The id is the first eight bytes of the DID's
// SHA-256 digest, so the same account gets the same id in every run and
// snapshots fetched at different times share one id space.

use sha2::{Digest, Sha256};

/// The stable, non-zero id for `did`.
pub fn did_to_id(did: &str) -> u64 {
    let digest = Sha256::digest(did.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    // Zero is reserved for "no id"
    u64::from_be_bytes(prefix).max(1)
}

/// Map a list of DIDs to ids, in order.
pub fn dids_to_ids<'a, I>(dids: I) -> Vec<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    dids.into_iter().map(did_to_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_fixed_for_a_did() {
        // Pinned so snapshot files stay comparable across releases
        assert_eq!(
            did_to_id("did:plc:z72i7hdynmk6r22z27h6tvur"),
            17_705_192_013_881_333_377
        );
    }

    #[test]
    fn test_distinct_dids_get_distinct_ids() {
        let a = did_to_id("did:plc:aaa");
        let b = did_to_id("did:plc:bbb");
        assert_ne!(a, b);
        assert_ne!(a, 0);
        assert_ne!(b, 0);
    }

    #[test]
    fn test_dids_to_ids_keeps_order() {
        let ids = dids_to_ids(["did:plc:aaa", "did:plc:bbb"]);
        assert_eq!(ids, vec![did_to_id("did:plc:aaa"), did_to_id("did:plc:bbb")]);
    }
}
