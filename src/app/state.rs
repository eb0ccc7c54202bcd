//! Published search state.
//!
//! This module defines [`SearchSnapshot`], the value the coordinator
//! publishes to the presentation layer after every transition. Snapshots are
//! plain data: the presentation layer renders them and never mutates them.

use crate::domain::{empty_result, SearchResult};

/// The coordinator's externally visible state at one point in time.
///
/// Mutated only by the coordinator. The combination of fields encodes the
/// state machine position: idle (nothing set), loading (`loading` true),
/// settled success (results, no error), settled error (`error` set, previous
/// results retained underneath the banner).
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    /// Whether a fetch is in flight. Never true for cache hits.
    pub loading: bool,

    /// Most recently published result set.
    ///
    /// Left untouched by failures so the last successful results stay
    /// visible under the error banner.
    pub results: SearchResult,

    /// User-facing message for the most recent failure, if any.
    pub error: Option<String>,

    /// Whether the error banner should currently be shown.
    ///
    /// Dismissing the banner clears this flag without clearing `error`.
    pub show_error_banner: bool,
}

impl SearchSnapshot {
    /// Returns the idle snapshot: no query, no results, no error.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            loading: false,
            results: empty_result(),
            error: None,
            show_error_banner: false,
        }
    }
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
