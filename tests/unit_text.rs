// Unit tests for tokenization and stopword filtering.
//
// Covers token order and counts on reference sentences, stopword handling,
// and the @mention / #hashtag merging pass on real post text.

use affinity::text::{Stopwords, Tokenizer};

const SENTENCE: &str = "It was neither this, that, nor any other thing.";

const TWEET: &str = "At least I can get your humor through tweets. RT @abdur: \
I don't mean this in a bad way, but genetically speaking your a cul-de-sac.";

// ============================================================
// Base tokenizer
// ============================================================

#[test]
fn sentence_with_stopwords() {
    let tokenizer = Tokenizer::social(Some(Stopwords::from_words(["this", "that", "other"])));
    let tokens = tokenizer.tokenize(SENTENCE);

    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0], "it");
    assert_eq!(tokens[5], "thing");
    assert!(!tokens.contains(&"other".to_string()));
}

#[test]
fn sentence_without_stopwords() {
    let tokenizer = Tokenizer::social(None);
    let tokens = tokenizer.tokenize(SENTENCE);

    assert_eq!(tokens.len(), 9);
    assert_eq!(tokens[0], "it");
    assert_eq!(tokens[8], "thing");
    assert_eq!(tokens.iter().position(|t| t == "other"), Some(7));
}

#[test]
fn empty_stopword_set_filters_nothing() {
    let with_empty = Tokenizer::plain(Some(Stopwords::new())).tokenize(SENTENCE);
    let with_none = Tokenizer::plain(None).tokenize(SENTENCE);
    assert_eq!(with_empty, with_none);
}

#[test]
fn stopwords_added_in_any_case_still_match() {
    let mut stopwords = Stopwords::new();
    stopwords.add("NEITHER");
    let tokens = Tokenizer::plain(Some(stopwords)).tokenize(SENTENCE);
    assert!(!tokens.contains(&"neither".to_string()));
    assert_eq!(tokens.len(), 8);
}

#[test]
fn english_stopwords_remove_function_words() {
    let tokens = Tokenizer::plain(Some(Stopwords::english())).tokenize("The cat and the hat");
    assert_eq!(tokens, vec!["cat", "hat"]);
}

#[test]
fn contractions_stay_together() {
    let tokens = Tokenizer::plain(None).tokenize("I don't know");
    assert_eq!(tokens, vec!["i", "don't", "know"]);
}

#[test]
fn unicode_letters_are_words() {
    let tokens = Tokenizer::plain(None).tokenize("Café über naïve");
    assert_eq!(tokens, vec!["café", "über", "naïve"]);
}

// ============================================================
// Social tokenizer, marker merging
// ============================================================

#[test]
fn tweet_keeps_mention_and_hyphenated_word() {
    let tokenizer = Tokenizer::social(None);
    let tokens = tokenizer.tokenize(TWEET);

    assert_eq!(tokens.len(), 25);
    assert_eq!(tokens[10], "@abdur");
    assert_eq!(tokens[24], "cul-de-sac");
}

#[test]
fn plain_tokenizer_splits_mention() {
    let tokens = Tokenizer::plain(None).tokenize(TWEET);
    assert!(tokens.contains(&"abdur".to_string()));
    assert!(!tokens.iter().any(|t| t.starts_with('@')));
}

#[test]
fn hashtags_merge_and_lowercase() {
    let tokens = Tokenizer::social(None).tokenize("Loving #RustLang and #100DaysOfCode");
    assert_eq!(tokens, vec!["loving", "#rustlang", "and", "#100daysofcode"]);
}

#[test]
fn lone_marker_at_end_is_kept() {
    let tokens = Tokenizer::social(None).tokenize("ping me @");
    assert_eq!(tokens, vec!["ping", "me", "@"]);
}

#[test]
fn marker_followed_by_space_merges_with_next_token() {
    // Whitespace segments are discarded before merging, so the marker
    // joins whatever word comes next.
    let tokens = Tokenizer::social(None).tokenize("# topic");
    assert_eq!(tokens, vec!["#topic"]);
}

#[test]
fn tokenize_all_concatenates_in_order() {
    let tokenizer = Tokenizer::social(None);
    let tokens = tokenizer.tokenize_all(&["one two", "", "three"]);
    assert_eq!(tokens, vec!["one", "two", "three"]);
}
