//! Search coordination: debouncing, caching, and state publication.
//!
//! [`SearchCoordinator`] is the single writer of search state. It owns the
//! current query, restarts the debounce timer on every keystroke, consults
//! the result cache before touching the network, and publishes a
//! [`SearchSnapshot`] after every transition.
//!
//! # State machine
//!
//! ```text
//! Idle ──keystroke──▶ Debouncing ──timer──▶ Loading ──▶ Settled(Success)
//!   ▲                     │                    │
//!   └──── empty query ────┘                    └──────▶ Settled(Error)
//! ```
//!
//! Cache hits jump straight to `Settled(Success)`; `loading` never toggles
//! for them.
//!
//! # Supersession
//!
//! Every invocation of the search path takes a monotonically increasing
//! ticket. A fetch outcome is applied only while its ticket is still the
//! newest, so a slow response can never overwrite the results of a query
//! issued after it. Debounce cancellation covers the pre-send case; the
//! ticket check covers the post-send case. In-flight network calls are not
//! actively cancelled, only their outcomes discarded.

use crate::app::observable::ObservableValue;
use crate::app::state::SearchSnapshot;
use crate::cache::ResultsCache;
use crate::domain::SearchResult;
use crate::remote::SearchApi;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Coordinates debounced searches against an injected [`SearchApi`].
///
/// One instance is expected per active screen. All methods are cheap and
/// non-blocking; fetch work runs on spawned tasks. Methods must be called
/// from within a tokio runtime.
pub struct SearchCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    /// Injected search service; constructed explicitly by the embedder.
    api: Arc<dyn SearchApi>,

    /// Session-lifetime result cache, keyed by the exact trimmed query.
    cache: Mutex<ResultsCache>,

    /// Published state; presentation subscribes through a clone.
    snapshot: ObservableValue<SearchSnapshot>,

    /// Most recent non-empty trimmed query, used by `retry`.
    current_query: Mutex<String>,

    /// Pending debounce task; re-arming aborts the previous one so at most
    /// one timer is live per coordinator.
    debounce: Mutex<Option<JoinHandle<()>>>,

    /// Monotonic request sequence backing the supersession check.
    latest_ticket: AtomicU64,

    /// Quiet period after the last keystroke before a fetch is issued.
    debounce_delay: Duration,
}

impl SearchCoordinator {
    /// Creates a coordinator over the given search service.
    ///
    /// # Parameters
    ///
    /// * `api` - Search service collaborator (injected, not global)
    /// * `cache_capacity` - Entry count at which the cache full-clears
    /// * `debounce_delay` - Quiet period before a keystroke becomes a fetch
    #[must_use]
    pub fn new(api: Arc<dyn SearchApi>, cache_capacity: usize, debounce_delay: Duration) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                api,
                cache: Mutex::new(ResultsCache::new(cache_capacity)),
                snapshot: ObservableValue::new(SearchSnapshot::idle()),
                current_query: Mutex::new(String::new()),
                debounce: Mutex::new(None),
                latest_ticket: AtomicU64::new(0),
                debounce_delay,
            }),
        }
    }

    /// Returns a handle to the published state for reading and subscribing.
    #[must_use]
    pub fn snapshots(&self) -> ObservableValue<SearchSnapshot> {
        self.inner.snapshot.clone()
    }

    /// Reacts to a change of the query text.
    ///
    /// Unconditionally cancels any pending debounce timer. An empty (or
    /// whitespace-only) query supersedes any in-flight fetch and publishes
    /// the idle snapshot without ever touching the network. A non-empty
    /// query is trimmed, recorded as current, and armed behind a fresh
    /// debounce timer; only the last change within the quiet period results
    /// in a fetch.
    pub fn on_query_changed(&self, text: &str) {
        let trimmed = text.trim();

        if let Some(handle) = self.inner.debounce.lock().expect("debounce lock poisoned").take() {
            handle.abort();
        }

        if trimmed.is_empty() {
            tracing::debug!("query cleared, returning to idle");
            // Invalidate any in-flight fetch so its late response is discarded.
            self.inner.latest_ticket.fetch_add(1, Ordering::SeqCst);
            self.inner
                .current_query
                .lock()
                .expect("query lock poisoned")
                .clear();
            self.inner.snapshot.set(SearchSnapshot::idle());
            return;
        }

        *self.inner.current_query.lock().expect("query lock poisoned") = trimmed.to_string();

        tracing::debug!(
            query = %trimmed,
            delay_ms = self.inner.debounce_delay.as_millis() as u64,
            "debounce armed"
        );

        let inner = Arc::clone(&self.inner);
        let query = trimmed.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce_delay).await;
            // The fetch runs on its own task so a later re-arm cannot abort
            // a request that has already been dispatched.
            tokio::spawn(CoordinatorInner::run_search(Arc::clone(&inner), query));
        });

        *self.inner.debounce.lock().expect("debounce lock poisoned") = Some(handle);
    }

    /// Re-runs the search path with the current query.
    ///
    /// The cache is consulted as usual, so a retry after a transport failure
    /// re-fetches while a retry after a banner dismissal may settle from
    /// cache. A no-op when there is no current query.
    pub fn retry(&self) {
        let query = self
            .inner
            .current_query
            .lock()
            .expect("query lock poisoned")
            .clone();

        if query.is_empty() {
            tracing::debug!("retry requested with no active query");
            return;
        }

        tracing::debug!(query = %query, "retrying current query");
        tokio::spawn(CoordinatorInner::run_search(Arc::clone(&self.inner), query));
    }

    /// Hides the error banner without touching the message or results.
    ///
    /// Idempotent; repeated calls publish nothing new.
    pub fn dismiss_error_banner(&self) {
        let mut snapshot = self.inner.snapshot.current();
        if snapshot.show_error_banner {
            snapshot.show_error_banner = false;
            self.inner.snapshot.set(snapshot);
        }
    }
}

impl CoordinatorInner {
    /// One pass of the search path: ticket, cache, fetch, publish.
    async fn run_search(inner: Arc<Self>, query: String) {
        let ticket = inner.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let cached = inner.cache.lock().expect("cache lock poisoned").get(&query);
        if let Some(results) = cached {
            tracing::debug!(query = %query, ticket, "cache hit");
            inner.snapshot.set(SearchSnapshot {
                loading: false,
                results,
                error: None,
                show_error_banner: false,
            });
            return;
        }

        tracing::debug!(query = %query, ticket, "cache miss, fetching");
        let previous = inner.snapshot.current().results;
        inner.snapshot.set(SearchSnapshot {
            loading: true,
            results: previous,
            error: None,
            show_error_banner: false,
        });

        let outcome = inner.api.search(&query).await;

        if inner.latest_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(query = %query, ticket, "response superseded, discarding");
            return;
        }

        match outcome {
            Ok(records) => {
                let results: SearchResult = Arc::new(records);
                inner
                    .cache
                    .lock()
                    .expect("cache lock poisoned")
                    .put(&query, Arc::clone(&results));
                tracing::debug!(
                    query = %query,
                    record_count = results.len(),
                    "search settled successfully"
                );
                inner.snapshot.set(SearchSnapshot {
                    loading: false,
                    results,
                    error: None,
                    show_error_banner: false,
                });
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "search failed");
                let retained = inner.snapshot.current().results;
                inner.snapshot.set(SearchSnapshot {
                    loading: false,
                    results: retained,
                    error: Some(e.user_message()),
                    show_error_banner: true,
                });
            }
        }
    }
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("current_query", &self.inner.current_query.lock().expect("query lock poisoned"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MeridianError, OrganRecord, Result};
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::collections::HashMap;
    use tokio::time::advance;

    #[derive(Clone)]
    enum Canned {
        Records(Vec<OrganRecord>),
        Http(u16),
        Network,
    }

    /// Scripted search service recording every call it receives.
    struct FakeApi {
        responses: Mutex<HashMap<String, Canned>>,
        delays: Mutex<HashMap<String, Duration>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(HashMap::new()),
                delays: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn respond(&self, query: &str, response: Canned) {
            self.responses.lock().unwrap().insert(query.to_string(), response);
        }

        fn delay(&self, query: &str, delay: Duration) {
            self.delays.lock().unwrap().insert(query.to_string(), delay);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SearchApi for FakeApi {
        fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<OrganRecord>>> {
            self.calls.lock().unwrap().push(query.to_string());
            let response = self
                .responses
                .lock()
                .unwrap()
                .get(query)
                .cloned()
                .unwrap_or(Canned::Records(vec![]));
            let delay = self.delays.lock().unwrap().get(query).copied();

            async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                match response {
                    Canned::Records(records) => Ok(records),
                    Canned::Http(status) => Err(MeridianError::Http { status }),
                    Canned::Network => Err(MeridianError::Network("connection reset".to_string())),
                }
            }
            .boxed()
        }

        fn health(&self) -> BoxFuture<'_, Result<()>> {
            async { Ok(()) }.boxed()
        }
    }

    fn organ(name: &str) -> OrganRecord {
        OrganRecord {
            organ: name.to_string(),
            patterns: vec![],
        }
    }

    fn coordinator_over(api: Arc<FakeApi>) -> SearchCoordinator {
        SearchCoordinator::new(api, 50, Duration::from_millis(500))
    }

    /// Lets spawned debounce/fetch tasks run to their next await point.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_query_returns_to_idle_without_fetch() {
        let api = FakeApi::new();
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("   ");
        settle().await;
        advance(Duration::from_secs(2)).await;
        settle().await;

        assert!(api.calls().is_empty());
        let snapshot = coordinator.snapshots().current();
        assert!(!snapshot.loading);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.show_error_banner);
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_last_keystroke_in_the_window_fetches() {
        let api = FakeApi::new();
        api.respond("liver", Canned::Records(vec![organ("Liver")]));
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("liv");
        settle().await;
        advance(Duration::from_millis(200)).await;
        coordinator.on_query_changed("liver");
        settle().await;

        advance(Duration::from_millis(499)).await;
        settle().await;
        assert!(api.calls().is_empty(), "fetch fired before the quiet period elapsed");

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(api.calls(), vec!["liver"]);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_query_is_served_from_cache() {
        let api = FakeApi::new();
        api.respond("liver", Canned::Records(vec![organ("Liver")]));
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("liver");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(api.calls().len(), 1);
        let first = coordinator.snapshots().current().results;

        // Second round: watch for any loading toggle while the cache answers.
        let toggles = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&toggles);
        let handle = coordinator
            .snapshots()
            .subscribe(move |snapshot: &SearchSnapshot| sink.lock().unwrap().push(snapshot.loading));

        coordinator.on_query_changed("liver");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;

        assert_eq!(api.calls().len(), 1, "cache hit must not refetch");
        let snapshot = coordinator.snapshots().current();
        assert!(Arc::ptr_eq(&snapshot.results, &first));
        assert!(toggles.lock().unwrap().iter().all(|loading| !loading));
        handle.unsubscribe();
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_cannot_overwrite_newer_results() {
        let api = FakeApi::new();
        api.respond("alpha", Canned::Records(vec![organ("Alpha")]));
        api.delay("alpha", Duration::from_millis(800));
        api.respond("beta", Canned::Records(vec![organ("Beta")]));
        api.delay("beta", Duration::from_millis(50));
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("alpha");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(api.calls(), vec!["alpha"]);

        coordinator.on_query_changed("beta");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;
        advance(Duration::from_millis(50)).await;
        settle().await;
        assert_eq!(coordinator.snapshots().current().results[0].organ, "Beta");

        // Alpha's response arrives last and must be discarded.
        advance(Duration::from_millis(800)).await;
        settle().await;
        let snapshot = coordinator.snapshots().current();
        assert_eq!(snapshot.results[0].organ, "Beta");
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_query_discards_an_inflight_fetch() {
        let api = FakeApi::new();
        api.respond("alpha", Canned::Records(vec![organ("Alpha")]));
        api.delay("alpha", Duration::from_millis(100));
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("alpha");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(api.calls(), vec!["alpha"]);

        coordinator.on_query_changed("");
        settle().await;
        advance(Duration::from_millis(100)).await;
        settle().await;

        let snapshot = coordinator.snapshots().current();
        assert!(snapshot.results.is_empty());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn http_failure_raises_banner_and_keeps_previous_results() {
        let api = FakeApi::new();
        api.respond("liver", Canned::Records(vec![organ("Liver")]));
        api.respond("spleen", Canned::Http(500));
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("liver");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;

        coordinator.on_query_changed("spleen");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;

        let snapshot = coordinator.snapshots().current();
        assert!(snapshot.error.as_ref().unwrap().contains("500"));
        assert!(snapshot.show_error_banner);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.results[0].organ, "Liver", "failure must not clear prior results");
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_the_banner_keeps_message_and_results() {
        let api = FakeApi::new();
        api.respond("kidney", Canned::Network);
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("kidney");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert!(coordinator.snapshots().current().show_error_banner);

        coordinator.dismiss_error_banner();
        coordinator.dismiss_error_banner();

        let snapshot = coordinator.snapshots().current();
        assert!(!snapshot.show_error_banner);
        assert!(snapshot.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_refetches_the_current_query() {
        let api = FakeApi::new();
        api.respond("kidney", Canned::Network);
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("kidney");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert!(coordinator.snapshots().current().error.is_some());

        api.respond("kidney", Canned::Records(vec![organ("Kidney")]));
        coordinator.retry();
        settle().await;

        assert_eq!(api.calls().len(), 2);
        let snapshot = coordinator.snapshots().current();
        assert_eq!(snapshot.results[0].organ, "Kidney");
        assert!(snapshot.error.is_none());
        assert!(!snapshot.show_error_banner);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_without_a_query_is_a_no_op() {
        let api = FakeApi::new();
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.retry();
        settle().await;

        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn query_is_trimmed_before_fetch_and_cache() {
        let api = FakeApi::new();
        api.respond("liver", Canned::Records(vec![organ("Liver")]));
        let coordinator = coordinator_over(Arc::clone(&api));

        coordinator.on_query_changed("  liver  ");
        settle().await;
        advance(Duration::from_millis(500)).await;
        settle().await;

        assert_eq!(api.calls(), vec!["liver"]);
        assert_eq!(coordinator.snapshots().current().results[0].organ, "Liver");
    }
}
