//! `ecomsync`: push ERP stock levels to Shopify.
//!
//! Run with: `ecomsync <command>`
//!
//! Progress goes to tracing; the one-line run result goes to stdout.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;

use ecomsync_infra::{AppConfig, ErpStore, InventorySyncRunner, JsonlSyncLog, ShopifyClient};
use ecomsync_sync::{InventorySync, RunOutcome};

type App = InventorySync<Arc<ErpStore>, ShopifyClient, JsonlSyncLog>;

fn main() -> ExitCode {
    let command = env::args().nth(1);

    let result = match command.as_deref() {
        Some("run") => build().and_then(|(app, _)| run_once(&app, false)),
        Some("run-now") => build().and_then(|(app, _)| run_once(&app, true)),
        Some("watch") => build().and_then(|(app, config)| watch(app, &config)),
        Some("help") | Some("--help") | Some("-h") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown command: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown command"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ecomsync failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("ecomsync: ERP -> Shopify inventory push");
    println!();
    println!("USAGE:");
    println!("    ecomsync <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    run       Scheduled push; skipped unless the sync frequency has elapsed");
    println!("    run-now   Push immediately, ignoring the sync frequency");
    println!("    watch     Keep running, invoking the scheduled push on an interval");
    println!("    help      Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    ECOMSYNC_STORE_PATH            ERP documents (JSON), required");
    println!("    ECOMSYNC_LOG_PATH              Audit log (JSON lines), default ecomsync-log.jsonl");
    println!("    SHOPIFY_SHOP_URL               Shop domain, required");
    println!("    SHOPIFY_ACCESS_TOKEN           Admin API token, required");
    println!("    SHOPIFY_API_VERSION            Default 2024-01");
    println!("    SHOPIFY_TIMEOUT_SECS           Default 30");
    println!("    ECOMSYNC_RUNNER_INTERVAL_SECS  watch tick, default 60");
    println!("    ECOMSYNC_LOG_FORMAT            json (default) or pretty");
    println!("    RUST_LOG                       Log filter, default info");
}

fn build() -> anyhow::Result<(App, AppConfig)> {
    ecomsync_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let store = ErpStore::open(&config.store_path).context("failed to open ERP store")?;
    let client = ShopifyClient::new(&config.shopify).context("failed to build Shopify client")?;
    let log = JsonlSyncLog::new(&config.log_path);

    tracing::info!(
        store = %config.store_path.display(),
        audit_log = %config.log_path.display(),
        api_base = %config.shopify.api_base(),
        "ecomsync configured"
    );
    Ok((InventorySync::new(Arc::new(store), client, log), config))
}

fn run_once(app: &App, ungated: bool) -> anyhow::Result<()> {
    let outcome = if ungated {
        app.run_now()
    } else {
        app.run_scheduled()
    }
    .context("inventory push aborted")?;

    match outcome {
        RunOutcome::Pushed(report) => println!(
            "pushed {} rows in {} batches: {} succeeded, {} failed, {} not found",
            report.rows, report.batches, report.succeeded, report.failed, report.not_found
        ),
        other => println!("no push: {other:?}"),
    }
    Ok(())
}

fn watch(app: App, config: &AppConfig) -> anyhow::Result<()> {
    let handle = InventorySyncRunner::new(config.runner_interval)
        .spawn("inventory-sync", app)
        .context("failed to spawn inventory sync runner")?;
    handle.wait();
    Ok(())
}
