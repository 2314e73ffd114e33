// Affinity: profile similarity scoring for Bluesky
//
// This is the library root. The core (text, similarity, profile) is pure
// and synchronous; the remaining modules fetch profiles and present results.

pub mod bluesky;
pub mod config;
pub mod interactive;
pub mod output;
pub mod profile;
pub mod similarity;
pub mod snapshot;
pub mod source;
pub mod text;
