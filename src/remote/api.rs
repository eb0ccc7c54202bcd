//! Search service abstraction.
//!
//! This module defines the [`SearchApi`] trait that abstracts over the remote
//! search service. The coordinator only ever talks to this trait, which keeps
//! the network client explicitly constructed and injected (no shared global
//! instance) and lets tests drive the coordinator with a fake service.

use crate::domain::{OrganRecord, Result};
use futures_util::future::BoxFuture;

/// Abstraction over the remote treatment reference service.
///
/// # Implementations
///
/// - [`HttpSearchApi`](crate::remote::HttpSearchApi): reqwest-backed client
///   against the hosted service (default)
pub trait SearchApi: Send + Sync {
    /// Performs a free-text search and returns the normalized organ records.
    ///
    /// The query is sent verbatim; callers are responsible for trimming.
    /// An empty match set is a successful empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a
    /// response body that does not normalize into organ records.
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<OrganRecord>>>;

    /// Probes the service liveness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy.
    fn health(&self) -> BoxFuture<'_, Result<()>>;
}
