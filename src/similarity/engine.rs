// Similarity engine: scores two profiles facet by facet.
//
// Relation facets (friends, followers) use the plain Jaccard overlap on id
// sets. Text facets (bio, favorites, posts) are tokenized into one
// frequency map per side and compared with the weighted overlap. Mentions
// are already a frequency map and are compared as-is.

use tracing::debug;

use super::metrics::{frequencies, overlap, weighted_overlap, FrequencyMap};
use super::result::{Facet, SimilarityResult};
use crate::profile::{same_identity, ProfileRecord};
use crate::text::Tokenizer;

/// Compare two profiles and explain the score.
pub fn compare(a: &ProfileRecord, b: &ProfileRecord, tokenizer: &Tokenizer) -> SimilarityResult {
    if same_identity(a, b) {
        debug!(id = %a.id(), "Same identity, skipping facet scoring");
        return SimilarityResult::identical();
    }

    let mut result = SimilarityResult::new();

    let friends = overlap(a.friends(), b.friends());
    result.set_facet(Facet::Friends, friends);
    result.set_friend_counts(a.friends().len(), b.friends().len());

    let followers = overlap(a.followers(), b.followers());
    result.set_facet(Facet::Followers, followers);
    result.set_follower_counts(a.followers().len(), b.followers().len());

    let mentions = weighted_overlap(a.mentions(), b.mentions());
    result.set_facet(Facet::Mentions, mentions);

    let bio = weighted_overlap(
        &text_frequencies(a.bio(), tokenizer),
        &text_frequencies(b.bio(), tokenizer),
    );
    result.set_facet(Facet::Bio, bio);

    let favorites = weighted_overlap(
        &frequencies(tokenizer.tokenize_all(a.favorites())),
        &frequencies(tokenizer.tokenize_all(b.favorites())),
    );
    result.set_facet(Facet::Favorites, favorites);

    let posts = weighted_overlap(
        &frequencies(tokenizer.tokenize_all(a.posts())),
        &frequencies(tokenizer.tokenize_all(b.posts())),
    );
    result.set_facet(Facet::Posts, posts);

    debug!(
        a = a.handle(),
        b = b.handle(),
        friends,
        followers,
        mentions,
        bio,
        favorites,
        posts,
        "Computed facet scores"
    );

    result.finalize();
    result
}

fn text_frequencies(text: Option<&str>, tokenizer: &Tokenizer) -> FrequencyMap {
    frequencies(tokenizer.tokenize(text.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_comparison_is_identical() {
        let p = ProfileRecord::builder("alice")
            .id(1)
            .bio("rust and coffee")
            .followers([2, 3])
            .build()
            .unwrap();
        let r = compare(&p, &p, &Tokenizer::social(None));
        assert_eq!(r.score(), 1.0);
        assert!(r.is_identical());
        assert_eq!(r.facet(Facet::Followers), 0.0);
    }

    #[test]
    fn test_mentions_are_not_tokenized() {
        let a = ProfileRecord::builder("a")
            .id(1)
            .mentions(["Bob.bsky.social"])
            .build()
            .unwrap();
        let b = ProfileRecord::builder("b")
            .id(2)
            .mentions(["bob.bsky.social"])
            .build()
            .unwrap();
        let r = compare(&a, &b, &Tokenizer::social(None));
        // Case differs, so raw keys don't match
        assert_eq!(r.facet(Facet::Mentions), 0.0);
    }

    #[test]
    fn test_counts_recorded_even_without_overlap() {
        let a = ProfileRecord::builder("a")
            .id(1)
            .friends([10, 11])
            .followers([20])
            .build()
            .unwrap();
        let b = ProfileRecord::builder("b").id(2).friends([12]).build().unwrap();
        let r = compare(&a, &b, &Tokenizer::plain(None));
        assert_eq!(r.friend_counts(), (2, 1));
        assert_eq!(r.follower_counts(), (1, 0));
        assert_eq!(r.score(), 0.0);
    }
}
