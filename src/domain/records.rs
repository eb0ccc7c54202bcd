//! Treatment reference domain model.
//!
//! This module defines the records the search service returns: organs, the
//! diagnostic patterns attributed to them, and the acupuncture points used to
//! treat each pattern. Records are immutable once decoded; a full result set
//! is shared with the presentation layer behind an [`Arc`] rather than cloned.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One diagnostic pattern with its symptoms and treatment points.
///
/// `symptoms` and `treatment_points` preserve the order the service returned;
/// practitioners read the point sequence as a protocol, not a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPattern {
    /// Pattern name, e.g. "Qi Stagnation".
    pub pattern: String,

    /// Symptoms associated with the pattern.
    pub symptoms: Vec<String>,

    /// Acupuncture point abbreviations, e.g. "LV3".
    pub treatment_points: Vec<String>,
}

/// One organ entry with all patterns matched for the query.
///
/// `organ` is unique within a single result set and serves as the display
/// key for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganRecord {
    /// Organ name, e.g. "Liver".
    pub organ: String,

    /// Patterns the service matched for this organ.
    pub patterns: Vec<TreatmentPattern>,
}

/// The result of one successful fetch for one query.
///
/// Stored in the cache and handed to subscribers as a cheap shared reference;
/// nothing mutates a result set after it is built.
pub type SearchResult = Arc<Vec<OrganRecord>>;

/// Returns an empty shared result set.
#[must_use]
pub fn empty_result() -> SearchResult {
    Arc::new(Vec::new())
}
