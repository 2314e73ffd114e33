// Similarity scoring: metrics, the comparison engine, and its result.

pub mod engine;
pub mod metrics;
pub mod result;

pub use engine::compare;
pub use result::{Facet, SimilarityResult};
