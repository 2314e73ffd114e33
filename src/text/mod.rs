// Text analysis: stopword filtering and social-aware tokenization.

pub mod stopwords;
pub mod tokenizer;

pub use stopwords::Stopwords;
pub use tokenizer::Tokenizer;
