//! Remote search service layer.
//!
//! This module owns everything that touches the wire: the [`SearchApi`]
//! trait the coordinator depends on, the reqwest-backed implementation, and
//! the normalization of the service's two response shapes into one canonical
//! record list.
//!
//! # Modules
//!
//! - `api`: Trait boundary between the coordinator and the service
//! - `http`: Reqwest client against the hosted backend
//! - `normalize`: Bare-object / array response folding

pub mod api;
pub mod http;
pub mod normalize;

pub use api::SearchApi;
pub use http::{HttpSearchApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use normalize::normalize_response;
