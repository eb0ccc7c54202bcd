//! Session-lifetime caching of search results.
//!
//! # Modules
//!
//! - `results`: Bounded query-to-result map with full-clear eviction

pub mod results;

pub use results::{ResultsCache, DEFAULT_CAPACITY};
