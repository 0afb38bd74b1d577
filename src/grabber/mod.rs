//! Grabber module: the concurrent discovery and download pipeline
//!
//! This module contains:
//! - The two-phase orchestrator and its lifecycle
//! - A bounded worker pool with join barriers
//! - Jittered pacing and random proxy rotation
//! - The HTTP client cache and the file downloader
//! - Error sinks and progress reporting

mod downloader;
mod http;
mod orchestrator;
mod pacing;
mod pool;
mod proxy;
mod report;
mod sink;

pub use downloader::{destination_path, file_name_for, Downloader, HttpDownloader};
pub use http::{build_http_client, HttpClients, HttpSettings};
pub use orchestrator::{GrabOutcome, GrabState, Grabber, GrabberSettings};
pub use pacing::DelayRange;
pub use pool::WorkerPool;
pub use proxy::ProxyPool;
pub use report::{GrabEvent, GrabReporter, TracingGrabReporter};
pub use sink::{CollectingErrorSink, ErrorSink, TallyErrorSink, TracingErrorSink};

use crate::config::Config;
use crate::source::{HtmlSource, Source};
use crate::ConfigError;
use std::sync::Arc;

/// Builds a ready-to-run grabber from a validated configuration
///
/// Every configured source and the downloader share one [`HttpClients`]
/// cache. Progress is reported through `tracing`.
///
/// # Arguments
///
/// * `config` - The grabber configuration
/// * `errors` - Sink receiving every failed task
///
/// # Returns
///
/// * `Ok(Grabber)` - All sources resolved and compiled
/// * `Err(ConfigError)` - Unknown preset, bad selector or bad delay range
pub fn build_grabber(config: &Config, errors: Arc<dyn ErrorSink>) -> Result<Grabber, ConfigError> {
    let clients = Arc::new(HttpClients::new(config.http_settings()));

    let sources = config
        .source_specs()?
        .into_iter()
        .map(|spec| HtmlSource::new(spec, Arc::clone(&clients)).map(|s| Arc::new(s) as Arc<dyn Source>))
        .collect::<Result<Vec<_>, _>>()?;

    let downloader = Arc::new(HttpDownloader::new(clients));

    Ok(Grabber::new(config.grabber_settings()?, sources, downloader, errors)
        .with_reporter(Arc::new(TracingGrabReporter)))
}
