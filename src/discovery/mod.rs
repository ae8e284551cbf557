//! Repository Discovery
//!
//! Lists the most-starred repositories matching a GitHub search query,
//! paginating until the requested count, the query's match count or the
//! search API's result ceiling is reached.

pub mod client;
pub mod error;

pub use client::{http_client, GithubClient, MAX_PER_PAGE, SEARCH_RESULT_CAP};
pub use error::{DiscoveryError, DiscoveryResult};
