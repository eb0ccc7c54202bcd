//! Terminal front end for the Meridian reference client.
//!
//! This is the thin presentation shim over the library: it wires the
//! configured HTTP client into a [`SearchCoordinator`], subscribes to the
//! published snapshots, and translates stdin lines into coordinator calls.
//! All coordination logic lives in the library; this binary only renders.
//!
//! # Startup Flow
//!
//! 1. Load configuration (first CLI argument, else the default path, else
//!    built-in defaults)
//! 2. Initialize tracing
//! 3. Ping the service's liveness endpoint and report reachability
//! 4. Enter the input loop
//!
//! # Commands
//!
//! - A plain line: change the query (debounced, like typing)
//! - `:retry`: re-run the current query after a failure
//! - `:dismiss`: hide the error banner
//! - `:quit` / `:q`: exit

use meridian::infrastructure::{default_config_path, default_log_dir};
use meridian::{Config, OrganRecord, SearchApi, SearchCoordinator, SearchSnapshot};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("meridian: {e}");
            return ExitCode::FAILURE;
        }
    };

    meridian::observability::init_tracing(&config);
    tracing::debug!(base_url = %config.base_url, "terminal client starting");

    let api = match meridian::HttpSearchApi::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    ) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            eprintln!("meridian: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    match api.health().await {
        Ok(()) => println!("Connected to {}.", config.base_url),
        Err(e) => println!("Service not reachable yet: {}", e.user_message()),
    }

    let service: Arc<dyn SearchApi> = api;
    let coordinator = SearchCoordinator::new(
        service,
        config.cache_capacity,
        Duration::from_millis(config.debounce_ms),
    );

    let subscription = coordinator.snapshots().subscribe(render_snapshot);

    println!("Search for patterns, organs or symptoms (e.g. 'Liver', 'Headache').");
    println!("Commands: :retry  :dismiss  :quit");

    input_loop(&coordinator).await;

    subscription.unsubscribe();
    ExitCode::SUCCESS
}

/// Resolves configuration from the CLI argument or the default location.
///
/// The terminal client logs to a file by default so tracing output does not
/// interleave with rendered results; a configured `log_dir` wins.
fn load_config() -> meridian::Result<Config> {
    let mut config = if let Some(path) = std::env::args().nth(1) {
        Config::from_file(path)?
    } else {
        let default_path = default_config_path();
        if default_path.exists() {
            Config::from_file(default_path)?
        } else {
            Config::default()
        }
    };

    if config.log_dir.is_none() {
        config.log_dir = Some(default_log_dir());
    }
    Ok(config)
}

/// Reads stdin lines and routes them to the coordinator until EOF or `:quit`.
async fn input_loop(coordinator: &SearchCoordinator) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.trim() {
                ":quit" | ":q" => break,
                ":retry" => coordinator.retry(),
                ":dismiss" => coordinator.dismiss_error_banner(),
                text => coordinator.on_query_changed(text),
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        }
    }
}

/// Renders one published snapshot as plain text.
fn render_snapshot(snapshot: &SearchSnapshot) {
    if snapshot.loading {
        println!("Searching...");
        return;
    }

    if snapshot.show_error_banner {
        if let Some(message) = &snapshot.error {
            println!("! {message}");
            println!("  (:retry to try again, :dismiss to hide)");
        }
        return;
    }

    if snapshot.results.is_empty() {
        println!("No results.");
        return;
    }

    for record in snapshot.results.iter() {
        render_record(record);
    }
}

fn render_record(record: &OrganRecord) {
    println!();
    println!("{}", record.organ);
    for pattern in &record.patterns {
        println!("  {}", pattern.pattern);
        println!("    Symptoms:  {}", pattern.symptoms.join(", "));
        println!("    Treatment: {}", pattern.treatment_points.join(", "));
    }
}
