//! Image Grabber main entry point
//!
//! This is the command-line interface for the image grabber.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use image_grabber::config::{load_config_with_hash, Config};
use image_grabber::grabber::{build_grabber, TallyErrorSink};
use image_grabber::output::{print_summary, write_markdown_summary, RunSummary};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Image Grabber: a paced, concurrent image harvester
///
/// Queries every configured image source for each keyword across several
/// result pages, then downloads all discovered images into a directory.
#[derive(Parser, Debug)]
#[command(name = "image-grabber")]
#[command(version)]
#[command(about = "A paced, concurrent image harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be grabbed without touching the network
    #[arg(long)]
    dry_run: bool,

    /// Override the directory images are saved to
    #[arg(long, value_name = "DIR")]
    target_dir: Option<PathBuf>,

    /// Write a Markdown run summary to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(dir) = &cli.target_dir {
        config.grabber.target_dir = dir.display().to_string();
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = Some(path.display().to_string());
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_grab(&config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("image_grabber=info,warn"),
            1 => EnvFilter::new("image_grabber=debug,info"),
            2 => EnvFilter::new("image_grabber=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let specs = config.source_specs()?;
    let settings = config.grabber_settings()?;

    println!("=== Image Grabber Dry Run ===\n");

    println!("Grabber Configuration:");
    println!("  Max concurrency: {}", settings.max_concurrency);
    println!("  Page depth: {}", settings.page_depth);
    println!("  Target directory: {}", settings.target_dir.display());
    println!(
        "  Pacing delay: {}ms - {}ms",
        settings.delay.min().as_millis(),
        settings.delay.max().as_millis()
    );

    println!("\nKeywords ({}):", settings.keywords.len());
    for keyword in &settings.keywords {
        println!("  - {}", keyword);
    }

    println!("\nProxies ({}):", settings.proxies.len());
    if settings.proxies.is_empty() {
        println!("  (direct connections)");
    }
    for proxy in &settings.proxies {
        println!("  - {}", proxy);
    }

    println!("\nSources ({}):", specs.len());
    for spec in &specs {
        println!("  - {} ({})", spec.name, spec.page_url);
    }

    let tasks = specs.len() * settings.keywords.len() * settings.page_depth as usize;
    let min_pacing = settings
        .delay
        .min_total(tasks)
        .map(format_duration)
        .unwrap_or_else(|| "unbounded".to_string());

    println!("\n✓ Configuration is valid");
    println!("✓ Would submit {} discovery tasks", tasks);
    println!("✓ Discovery pacing alone takes at least {}", min_pacing);

    Ok(())
}

/// Handles the main grab operation
async fn handle_grab(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let tally = Arc::new(TallyErrorSink::new());
    let grabber = Arc::new(build_grabber(config, tally.clone())?);

    tracing::info!(
        "Sources: {}, Keywords: {}, Planned discovery tasks: {}",
        grabber.source_names().len(),
        config.grabber.keywords.len(),
        grabber.planned_discovery_tasks()
    );

    {
        let grabber = Arc::clone(&grabber);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping");
                grabber.stop();
            }
        });
    }

    let started_at = Utc::now();
    let outcome = grabber.grab_detailed().await;
    let summary = RunSummary::from_outcome(&grabber, outcome, tally.counts(), started_at)
        .with_config_hash(config_hash);

    for path in &summary.saved {
        tracing::debug!("Saved {}", path.display());
    }

    print_summary(&summary);

    if let Some(path) = &config.output.summary_path {
        write_markdown_summary(&summary, Path::new(path))
            .with_context(|| format!("failed to write summary to {}", path))?;
        println!("\n✓ Summary exported to: {}", path);
    }

    Ok(())
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
