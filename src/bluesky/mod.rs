// Bluesky API client: profiles, posts, likes, and the follow graph.
//
// Built on the public AT Protocol API and atrium-api response types. Each
// submodule handles one area of the API surface; `source` assembles them
// into ProfileRecords.

pub mod client;
pub mod followers;
pub mod identity;
pub mod likes;
pub mod posts;
pub mod profiles;
pub mod rate_limit;
pub mod source;
