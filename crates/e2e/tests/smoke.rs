//! Route-sweep smoke runner
//!
//! Walks the protected route set, applying the page-readiness heuristic to
//! each, and reports pass/fail counts. Gated on `E2E_SMOKE=1` so a plain
//! `cargo test` without a deployment exits cleanly.
//!
//! Run with: E2E_SMOKE=1 cargo test --package bijmantra-e2e --test smoke

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bijmantra_e2e::{routes, E2eResult, Harness, Navigator};

#[derive(Parser, Debug)]
#[command(name = "bijmantra-e2e-smoke")]
#[command(about = "Route-sweep smoke runner for the Bijmantra console")]
struct Args {
    /// Only sweep routes containing this substring
    #[arg(short, long)]
    filter: Option<String>,

    /// Sweep with a fresh unauthenticated session instead of the persisted
    /// user state
    #[arg(long)]
    unauthenticated: bool,

    /// Seconds to wait for the backend health endpoint
    #[arg(long, default_value = "30")]
    health_timeout: u64,

    /// Write the sweep report as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RouteResult {
    route: String,
    success: bool,
    duration_ms: u64,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SweepResult {
    total: usize,
    passed: usize,
    failed: usize,
    duration_ms: u64,
    results: Vec<RouteResult>,
}

fn main() {
    if std::env::var("E2E_SMOKE").is_err() {
        eprintln!("smoke sweep skipped: set E2E_SMOKE=1 with a running deployment to enable");
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    match rt.block_on(run(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn run(args: Args) -> E2eResult<bool> {
    let harness = Harness::from_env();

    harness
        .api()
        .wait_for_healthy(Duration::from_secs(args.health_timeout))
        .await?;

    let session = if args.unauthenticated {
        harness.session().await?
    } else {
        match harness.authenticated_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(
                    "No usable auth state ({}); sweeping with an unauthenticated session",
                    e
                );
                harness.session().await?
            }
        }
    };

    let sweep_start = Instant::now();
    let mut results = Vec::new();
    let mut passed = 0usize;
    let mut failed = 0usize;

    {
        let nav = Navigator::new(&session);

        let selected: Vec<&str> = routes::protected_routes()
            .into_iter()
            .filter(|route| {
                args.filter
                    .as_deref()
                    .map_or(true, |needle| route.contains(needle))
            })
            .collect();

        info!("Sweeping {} route(s)...", selected.len());

        for route in selected {
            let start = Instant::now();
            match nav.goto(route).await {
                Ok(()) => {
                    passed += 1;
                    info!("✓ {} ({} ms)", route, start.elapsed().as_millis());
                    results.push(RouteResult {
                        route: route.to_string(),
                        success: true,
                        duration_ms: start.elapsed().as_millis() as u64,
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    error!("✗ {} - {}", route, e);
                    results.push(RouteResult {
                        route: route.to_string(),
                        success: false,
                        duration_ms: start.elapsed().as_millis() as u64,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
    }

    session.quit().await?;

    let summary = SweepResult {
        total: results.len(),
        passed,
        failed,
        duration_ms: sweep_start.elapsed().as_millis() as u64,
        results,
    };

    info!(
        "Sweep results: {} passed, {} failed ({} ms)",
        summary.passed, summary.failed, summary.duration_ms
    );

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!("Report written to: {}", path.display());
    }

    Ok(summary.failed == 0)
}
