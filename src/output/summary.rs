//! Run summary and console report

use crate::grabber::{GrabOutcome, Grabber};
use crate::ErrorKind;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of one grab run
#[derive(Debug, Clone)]
pub struct RunSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub config_hash: Option<String>,
    pub cancelled: bool,

    // Inputs
    pub sources: Vec<String>,
    pub keywords: Vec<String>,
    pub page_depth: u32,

    // Counters
    pub discovery_tasks: usize,
    pub discovered_urls: usize,
    pub download_tasks: usize,
    pub saved: Vec<PathBuf>,

    // Failures per kind
    pub failures: BTreeMap<ErrorKind, u64>,
}

impl RunSummary {
    /// Builds a summary from a finished run
    ///
    /// # Arguments
    ///
    /// * `grabber` - The grabber that ran
    /// * `outcome` - What `grab_detailed` returned
    /// * `failures` - Error counts per kind, usually from a `TallyErrorSink`
    /// * `started_at` - Wall-clock start of the run
    pub fn from_outcome(
        grabber: &Grabber,
        outcome: GrabOutcome,
        failures: BTreeMap<ErrorKind, u64>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let settings = grabber.settings();
        Self {
            started_at,
            finished_at: Utc::now(),
            elapsed: outcome.elapsed,
            config_hash: None,
            cancelled: grabber.is_cancelled(),
            sources: grabber.source_names(),
            keywords: settings.keywords.clone(),
            page_depth: settings.page_depth,
            discovery_tasks: outcome.discovery_tasks,
            discovered_urls: outcome.discovered_urls,
            download_tasks: outcome.download_tasks,
            saved: outcome.saved,
            failures,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Share of download tasks that saved a file, in percent
    pub fn success_rate(&self) -> f64 {
        if self.download_tasks == 0 {
            return 0.0;
        }
        (self.saved.len() as f64 / self.download_tasks as f64) * 100.0
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Grab Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Elapsed: {:.2}s", summary.elapsed.as_secs_f64());
    if summary.cancelled {
        println!("  Status: cancelled");
    }
    println!();

    println!("Inputs:");
    println!("  Sources: {}", summary.sources.join(", "));
    println!("  Keywords: {}", summary.keywords.join(", "));
    println!("  Page depth: {}", summary.page_depth);
    println!();

    println!("Progress:");
    println!("  Discovery tasks: {}", summary.discovery_tasks);
    println!("  Image URLs found: {}", summary.discovered_urls);
    println!("  Download tasks: {}", summary.download_tasks);
    println!("  Images saved: {}", summary.saved.len());
    println!();

    if !summary.failures.is_empty() {
        println!("Failures:");
        for (kind, count) in &summary.failures {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} downloads saved)",
        summary.success_rate(),
        summary.saved.len(),
        summary.download_tasks
    );
}


#[cfg(test)]
pub(crate) use tests::sample_summary;
