//! Meridian: a client for searching acupuncture treatment reference data.
//!
//! Meridian looks up organs, diagnostic patterns, symptoms, and treatment
//! points by free-text search against a remote reference service, and owns
//! the client-side coordination that makes that pleasant over a slow hosted
//! backend:
//! - Keystroke debouncing so only the last edit in a quiet period fetches
//! - An in-memory result cache with a deliberate full-clear overflow policy
//! - Normalization of the service's two response shapes (object vs. array)
//! - Supersession of stale in-flight responses
//! - A reactive latest-value container publishing loading/results/error state
//! - An authentication state machine with a client-side email allow-list
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal shim (main.rs)                            │  ← Presentation
//! └─────────────────────────────────────────────────────┘
//!                        │ subscribe / invoke
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Coordination
//! │  - Debounce and supersession                        │
//! │  - Cache consultation                               │
//! │  - Snapshot publication                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Cache Layer   │   │ Remote Layer  │   │ Auth Layer    │
//! │ (cache/)      │   │ (remote/)     │   │ (auth/)       │
//! │ - Full-clear  │   │ - reqwest     │   │ - State       │
//! │   eviction    │   │ - Normalize   │   │   machine     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths (infrastructure/)                          │
//! │  - Records and errors (domain/)                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Search coordinator, observable state, published snapshots
//! - [`auth`]: Authentication session over an injected backend
//! - [`cache`]: Session-lifetime result cache
//! - [`domain`]: Record types and the error enum
//! - [`infrastructure`]: Default filesystem locations
//! - [`remote`]: Search service trait, HTTP client, response normalization
//! - [`observability`]: Tracing setup
//!
//! # Example
//!
//! ```no_run
//! use meridian::{initialize, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     meridian::observability::init_tracing(&config);
//!
//!     let coordinator = initialize(&config).expect("client construction failed");
//!     let _subscription = coordinator.snapshots().subscribe(|snapshot| {
//!         println!("{} organ(s)", snapshot.results.len());
//!     });
//!
//!     coordinator.on_query_changed("Liver");
//! }
//! ```
//!
//! # Key Design Decisions
//!
//! ## Injected collaborators
//!
//! The HTTP client and the auth backend are constructed explicitly and
//! passed into their coordinators. There is no process-wide client
//! singleton; tests drive the coordinators with scripted fakes.
//!
//! ## Blunt cache eviction
//!
//! The result cache clears entirely when an insertion would exceed its
//! capacity. The per-session working set of repeated searches is small, and
//! the full-clear threshold is part of the component's observable contract
//! (see [`cache::ResultsCache`]).
//!
//! ## Failures stay visible, results stay put
//!
//! A failed fetch publishes a message and a banner flag but never clears
//! previously displayed results, so "the request failed" is distinguishable
//! from "nothing matched".

pub mod app;
pub mod auth;
pub mod cache;
pub mod domain;
pub mod infrastructure;
pub mod remote;

pub mod observability;

pub use app::{ObservableValue, SearchCoordinator, SearchSnapshot, SubscriptionHandle};
pub use auth::{AuthBackend, AuthSession, AuthState};
pub use domain::{MeridianError, OrganRecord, Result, SearchResult, TreatmentPattern};
pub use remote::{HttpSearchApi, SearchApi};

use crate::remote::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Client configuration.
///
/// All fields have defaults matching the hosted service, so
/// `Config::default()` yields a working client. A TOML file may override
/// any subset of fields; unknown keys are ignored.
///
/// # Example
///
/// ```toml
/// # ~/.config/meridian/config.toml
/// base_url = "https://fastapi-hosting.onrender.com"
/// debounce_ms = 500
/// cache_capacity = 50
/// allowed_email_domain = "gmail.com"
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base endpoint of the search service.
    pub base_url: String,

    /// HTTP request timeout in seconds.
    ///
    /// Generous by default: the free hosting tier cold-starts and first
    /// responses can take tens of seconds.
    pub request_timeout_secs: u64,

    /// Quiet period after the last keystroke before a fetch, in
    /// milliseconds.
    pub debounce_ms: u64,

    /// Cached query count at which the cache full-clears.
    pub cache_capacity: usize,

    /// Email domain accepted by the sign-in allow-list, without the `@`.
    pub allowed_email_domain: String,

    /// Tracing level filter. Options: `trace`, `debug`, `info`, `warn`,
    /// `error`. Default: `"info"`.
    pub trace_level: Option<String>,

    /// Directory for the rotating log file. When unset, logs go to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            debounce_ms: 500,
            cache_capacity: cache::DEFAULT_CAPACITY,
            allowed_email_domain: "gmail.com".to_string(),
            trace_level: None,
            log_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| MeridianError::Config(format!("invalid config file: {e}")))
    }
}

/// Builds a search coordinator wired to the configured HTTP service.
///
/// This is the composition root for the common case; embedders needing a
/// different transport construct [`SearchCoordinator`] directly with their
/// own [`SearchApi`] implementation.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn initialize(config: &Config) -> Result<SearchCoordinator> {
    tracing::debug!(base_url = %config.base_url, "initializing search coordinator");

    let api = HttpSearchApi::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    Ok(SearchCoordinator::new(
        Arc::new(api),
        config.cache_capacity,
        Duration::from_millis(config.debounce_ms),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_matches_the_hosted_service() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://fastapi-hosting.onrender.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.cache_capacity, 50);
        assert_eq!(config.allowed_email_domain, "gmail.com");
        assert!(config.trace_level.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn partial_config_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://staging.example.test\"").unwrap();
        writeln!(file, "trace_level = \"debug\"").unwrap();
        writeln!(file, "future_knob = true").unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.base_url, "https://staging.example.test");
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.cache_capacity, 50);
    }

    #[test]
    fn invalid_config_file_reports_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = [not toml").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, MeridianError::Config(_)));
    }

    #[test]
    fn missing_config_file_reports_an_io_error() {
        let err = Config::from_file("/definitely/not/a/real/path.toml").unwrap_err();
        assert!(matches!(err, MeridianError::Io(_)));
    }

    #[test]
    fn initialize_builds_a_coordinator_from_defaults() {
        assert!(initialize(&Config::default()).is_ok());
    }
}
