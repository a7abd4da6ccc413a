// src/main.rs

//! Lexwatch: Legal and Regulatory Update Collector CLI

use chrono::Utc;
use clap::{Parser, Subcommand};

use lexwatch::error::{AppError, Result};
use lexwatch::models::{CanonicalRecord, Config, IngestStatus};
use lexwatch::pipeline::{build_summary, run_collect};
use lexwatch::store::{self, UpsertOp};

/// URL key used by the `ping` probe document.
const PROBE_URL: &str = "https://lexwatch.invalid/store-probe";

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(
    name = "lexwatch",
    version,
    about = "Collects legal and regulatory update notices"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Run one full collection over all configured sources
    Collect,
    /// Load and validate the configuration
    Validate,
    /// Print an aggregate report over the stored updates
    Summary,
    /// Write a probe document to verify store connectivity
    Ping,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // A broken configuration is fatal before anything runs.
    let config = Config::load(&cli.config)
        .map_err(|e| AppError::config(format!("cannot load {}: {}", cli.config, e)))?;
    config.validate()?;

    match cli.command {
        Command::Collect => {
            let report = run_collect(&config).await?;
            println!(
                "Collected {} feed update(s) and {} page update(s); {} source failure(s)",
                report.feed_total, report.page_total, report.sources_failed
            );
        }
        Command::Validate => {
            println!("Configuration OK: {}", cli.config);
            println!("    feeds: {}", config.feeds.len());
            println!("    pages: {}", config.pages.len());
            println!("    user_agent: {}", config.fetch.user_agent);
            println!("    timeout_secs: {}", config.fetch.timeout_secs);
            println!(
                "    store: {}/{}.json",
                config.store.root_dir, config.store.collection
            );
        }
        Command::Summary => {
            let store = store::connect(&config.store).await?;
            let summary = build_summary(store.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            println!("\n--- Recent sample (source / title / url / content_len) ---");
            for entry in &summary.recent {
                println!(
                    "- {:<24} | {:<60} | {} | len={}",
                    entry.source,
                    entry.title.chars().take(60).collect::<String>(),
                    entry.url.as_deref().unwrap_or("-"),
                    entry.content_len
                );
            }
        }
        Command::Ping => {
            let store = store::connect(&config.store).await?;
            let record = CanonicalRecord {
                title: "Store connection successful".to_string(),
                url: Some(PROBE_URL.to_string()),
                content_raw: "connection test".to_string(),
                published_at: None,
                category: "Probe".to_string(),
                source: "store_probe".to_string(),
                fetched_at: Utc::now(),
                ingest_status: IngestStatus::Raw,
            };
            store
                .upsert_one(&UpsertOp {
                    url: PROBE_URL.to_string(),
                    record,
                })
                .await?;

            let found = store
                .find_by_url(PROBE_URL)
                .await?
                .ok_or_else(|| AppError::store("ping", "probe document missing after write"))?;
            println!("Store OK: probe document written at {}", found.fetched_at);
        }
    }

    Ok(())
}
