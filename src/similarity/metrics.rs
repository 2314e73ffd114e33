// Set-similarity metrics for relation sets and word-frequency maps.
//
// Both metrics are intersection-over-union ratios. The unweighted one
// (Jaccard) works on plain sets: shared followers, shared follows. The
// weighted one treats a frequency map as a multiset:
//
//   sum(min(count_a, count_b)) / sum(max(count_a, count_b))
//
// A key missing from one side counts as zero there, so it only adds to the
// union. This behaves like a cosine for term vectors (identical maps score
// 1.0, disjoint maps 0.0, more shared frequency scores higher) without
// computing vector norms. It is not a true cosine.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Token → occurrence count.
pub type FrequencyMap = HashMap<String, u32>;

/// Jaccard coefficient of two sets.
///
/// Returns 0.0 when either set is empty.
pub fn overlap<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.iter().filter(|item| b.contains(*item)).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Frequency-weighted overlap of two count maps.
///
/// Returns 0.0 when either map is empty, or when every count is zero.
pub fn weighted_overlap<K: Eq + Hash>(a: &HashMap<K, u32>, b: &HashMap<K, u32>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut intersection: u64 = 0;
    let mut union: u64 = 0;

    for (key, &count_a) in a {
        match b.get(key) {
            Some(&count_b) => {
                intersection += u64::from(count_a.min(count_b));
                union += u64::from(count_a.max(count_b));
            }
            None => union += u64::from(count_a),
        }
    }

    // Keys only in b
    union += b
        .iter()
        .filter(|(key, _)| !a.contains_key(*key))
        .map(|(_, &count)| u64::from(count))
        .sum::<u64>();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Add one occurrence of each token to `map`.
pub fn count_into<I, S>(tokens: I, map: &mut FrequencyMap)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for token in tokens {
        *map.entry(token.into()).or_insert(0) += 1;
    }
}

/// Build a frequency map from a token sequence.
pub fn frequencies<I, S>(tokens: I) -> FrequencyMap
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut map = FrequencyMap::new();
    count_into(tokens, &mut map);
    map
}
