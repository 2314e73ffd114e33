// SimilarityResult: per-facet scores, aggregate score, and justification.
//
// The aggregate is the product of every facet score that is strictly
// positive. A zero facet (no bio, no likes) is left out of the product
// rather than zeroing the whole match. When nothing is positive the score
// stays 0.0 and the justification says so.

use std::fmt;

use serde::Serialize;

/// Justification used when no facet has any overlap.
pub const NOTHING_IN_COMMON: &str = "Users have nothing in common.";

/// Justification used when both records are the same account.
pub const IDENTICAL_IDENTITY: &str = "Profiles have identical identity.";

/// One independently scored dimension of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Friends,
    Followers,
    Mentions,
    Bio,
    Favorites,
    Posts,
}

impl Facet {
    /// All facets, in justification order.
    pub const ALL: [Facet; 6] = [
        Facet::Friends,
        Facet::Followers,
        Facet::Mentions,
        Facet::Bio,
        Facet::Favorites,
        Facet::Posts,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Facet::Friends => "similarity between friends",
            Facet::Followers => "similarity between followers",
            Facet::Mentions => "similarity between users/topics mentioned",
            Facet::Bio => "similarity between biographies",
            Facet::Favorites => "similarity between favorite posts",
            Facet::Posts => "similarity between regular posts",
        }
    }

    fn index(self) -> usize {
        match self {
            Facet::Friends => 0,
            Facet::Followers => 1,
            Facet::Mentions => 2,
            Facet::Bio => 3,
            Facet::Favorites => 4,
            Facet::Posts => 5,
        }
    }
}

/// The outcome of comparing two profiles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimilarityResult {
    score: f64,
    identical: bool,
    facets: [f64; 6],
    friend_counts: (usize, usize),
    follower_counts: (usize, usize),
    justification: String,
}

impl SimilarityResult {
    /// An empty result with every facet at 0.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The result for two records with the same identity.
    pub fn identical() -> Self {
        Self {
            score: 1.0,
            identical: true,
            justification: IDENTICAL_IDENTITY.to_string(),
            ..Self::default()
        }
    }

    pub fn set_facet(&mut self, facet: Facet, score: f64) {
        self.facets[facet.index()] = score;
    }

    pub fn set_friend_counts(&mut self, a: usize, b: usize) {
        self.friend_counts = (a, b);
    }

    pub fn set_follower_counts(&mut self, a: usize, b: usize) {
        self.follower_counts = (a, b);
    }

    /// Compute the aggregate score and justification from the facet scores.
    pub fn finalize(&mut self) {
        let mut lines = Vec::new();
        let mut score = 1.0;

        for facet in Facet::ALL {
            let value = self.facets[facet.index()];
            if value <= 0.0 {
                continue;
            }
            score *= value;

            let counts = match facet {
                Facet::Friends => Some(self.friend_counts),
                Facet::Followers => Some(self.follower_counts),
                _ => None,
            };
            lines.push(match counts {
                Some((a, b)) => format!("{value:6.4} ({} [{a} / {b}])", facet.description()),
                None => format!("{value:6.4} ({})", facet.description()),
            });
        }

        if lines.is_empty() {
            self.justification = NOTHING_IN_COMMON.to_string();
        } else {
            self.score = score;
            self.justification = lines.join("\n");
        }
    }

    /// The aggregate score in [0, 1].
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }

    pub fn facet(&self, facet: Facet) -> f64 {
        self.facets[facet.index()]
    }

    pub fn friend_counts(&self) -> (usize, usize) {
        self.friend_counts
    }

    pub fn follower_counts(&self) -> (usize, usize) {
        self.follower_counts
    }

    pub fn is_identical(&self) -> bool {
        self.identical
    }
}

impl fmt::Display for SimilarityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Similarity score: {:6.4}\n{}", self.score, self.justification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_in_common() {
        let mut r = SimilarityResult::new();
        r.finalize();
        assert_eq!(r.score(), 0.0);
        assert_eq!(r.justification(), NOTHING_IN_COMMON);
    }

    #[test]
    fn test_zero_facets_are_skipped() {
        let mut r = SimilarityResult::new();
        r.set_facet(Facet::Followers, 0.5);
        r.set_facet(Facet::Posts, 0.5);
        r.finalize();
        assert_eq!(r.score(), 0.25);
        assert_eq!(r.justification().lines().count(), 2);
    }

    #[test]
    fn test_relation_lines_include_counts() {
        let mut r = SimilarityResult::new();
        r.set_facet(Facet::Friends, 0.25);
        r.set_friend_counts(3, 2);
        r.finalize();
        assert_eq!(r.justification(), "0.2500 (similarity between friends [3 / 2])");
    }

    #[test]
    fn test_display_format() {
        let mut r = SimilarityResult::new();
        r.set_facet(Facet::Bio, 0.75);
        r.finalize();
        assert_eq!(
            r.to_string(),
            "Similarity score: 0.7500\n0.7500 (similarity between biographies)"
        );
    }

    #[test]
    fn test_identical_result() {
        let r = SimilarityResult::identical();
        assert_eq!(r.score(), 1.0);
        assert!(r.is_identical());
        assert_eq!(r.to_string(), "Similarity score: 1.0000\nProfiles have identical identity.");
    }
}
