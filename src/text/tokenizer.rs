// Word tokenizer with optional social-media marker handling.
//
// Text is split on Unicode (UAX #29) word boundaries. Each segment is kept
// only if its first character can start a word: a letter or digit, or one of
// the configured marker characters. Kept segments are lowercased and dropped
// if they are stopwords.
//
// UAX #29 splits `@alice` into `@` and `alice`, so a tokenizer with markers
// runs a second pass that glues a lone marker back onto the token after it.
// It also splits hyphenated compounds, which we fold back together before
// filtering so `cul-de-sac` stays one word.

use unicode_segmentation::UnicodeSegmentation;

use super::stopwords::Stopwords;

/// Marker characters used on Bluesky and similar platforms.
pub const SOCIAL_MARKERS: [char; 2] = ['@', '#'];

/// Splits text into lowercase word tokens.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: Option<Stopwords>,
    markers: Vec<char>,
}

impl Tokenizer {
    /// A tokenizer where only letters and digits start words.
    pub fn plain(stopwords: Option<Stopwords>) -> Self {
        Self::with_markers(stopwords, &[])
    }

    /// A tokenizer that keeps `@mentions` and `#hashtags` as single tokens.
    pub fn social(stopwords: Option<Stopwords>) -> Self {
        Self::with_markers(stopwords, &SOCIAL_MARKERS)
    }

    /// A tokenizer with a custom set of marker characters.
    pub fn with_markers(stopwords: Option<Stopwords>, markers: &[char]) -> Self {
        Self {
            stopwords,
            markers: markers.to_vec(),
        }
    }

    pub fn stopwords(&self) -> Option<&Stopwords> {
        self.stopwords.as_ref()
    }

    pub fn markers(&self) -> &[char] {
        &self.markers
    }

    /// Whether `ch` may start a token.
    pub fn is_word_char(&self, ch: char) -> bool {
        ch.is_alphanumeric() || self.markers.contains(&ch)
    }

    /// Tokenize `text`, preserving left-to-right order.
    ///
    /// Empty input gives an empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = word_segments(text)
            .into_iter()
            .filter(|segment| segment.chars().next().is_some_and(|c| self.is_word_char(c)))
            .map(str::to_lowercase)
            .filter(|word| !self.stopwords.as_ref().is_some_and(|sw| sw.contains(word)))
            .collect();

        if self.markers.is_empty() {
            tokens
        } else {
            self.merge_markers(tokens)
        }
    }

    /// Tokenize every text in `texts` into one flat vector.
    pub fn tokenize_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts
            .iter()
            .flat_map(|text| self.tokenize(text.as_ref()))
            .collect()
    }

    /// Join each lone marker token with the token that follows it.
    ///
    /// Rebuilds into a new vector; scanning resumes after the merged pair.
    fn merge_markers(&self, tokens: Vec<String>) -> Vec<String> {
        let mut merged = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            if i + 1 < tokens.len() && self.is_lone_marker(&tokens[i]) {
                merged.push(format!("{}{}", tokens[i], tokens[i + 1]));
                i += 2;
            } else {
                merged.push(tokens[i].clone());
                i += 1;
            }
        }
        merged
    }

    fn is_lone_marker(&self, token: &str) -> bool {
        let mut chars = token.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if self.markers.contains(&c))
    }
}

/// Split `text` on UAX #29 word boundaries, folding `word-word` runs into one
/// segment when the hyphen has no surrounding whitespace.
fn word_segments(text: &str) -> Vec<&str> {
    let bounds: Vec<(usize, &str)> = text.split_word_bound_indices().collect();
    let mut segments = Vec::with_capacity(bounds.len());

    let mut i = 0;
    while i < bounds.len() {
        let (start, segment) = bounds[i];
        let mut end = start + segment.len();

        if starts_alphanumeric(segment) {
            while i + 2 < bounds.len()
                && is_hyphen(bounds[i + 1].1)
                && starts_alphanumeric(bounds[i + 2].1)
            {
                let (next_start, next) = bounds[i + 2];
                end = next_start + next.len();
                i += 2;
            }
        }

        segments.push(&text[start..end]);
        i += 1;
    }

    segments
}

fn starts_alphanumeric(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_alphanumeric)
}

fn is_hyphen(segment: &str) -> bool {
    segment == "-" || segment == "\u{2010}"
}
