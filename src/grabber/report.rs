//! Progress reporting
//!
//! The orchestrator describes what it is doing as [`GrabEvent`]s. A
//! [`GrabReporter`] decides what to do with them.

use std::path::Path;
use std::time::Duration;

/// Progress event of a grab run
#[derive(Debug, Clone)]
pub enum GrabEvent<'a> {
    Started {
        sources: usize,
        keywords: usize,
        page_depth: u32,
        proxies: usize,
    },
    DiscoveryQueued {
        task: usize,
        source: &'a str,
        keyword: &'a str,
        page: u32,
        proxy: Option<&'a str>,
    },
    DiscoveryFinished {
        tasks: usize,
        urls: usize,
    },
    DownloadQueued {
        task: usize,
        url: &'a str,
        proxy: Option<&'a str>,
    },
    Saved {
        url: &'a str,
        path: &'a Path,
    },
    Finished {
        saved: usize,
        elapsed: Duration,
    },
    StopRequested,
}

/// Receiver of [`GrabEvent`]s, ignores everything by default
pub trait GrabReporter: Send + Sync {
    fn report(&self, event: GrabEvent<'_>) {
        let _ = event;
    }
}

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingGrabReporter;

impl GrabReporter for TracingGrabReporter {
    fn report(&self, event: GrabEvent<'_>) {
        match event {
            GrabEvent::Started {
                sources,
                keywords,
                page_depth,
                proxies,
            } => {
                tracing::info!(%sources, %keywords, %page_depth, %proxies, "Image grabber started");
            }
            GrabEvent::DiscoveryQueued {
                task,
                source,
                keyword,
                page,
                proxy,
            } => {
                tracing::debug!(%task, %source, %keyword, %page, ?proxy, "Discovery task queued");
            }
            GrabEvent::DiscoveryFinished { tasks, urls } => {
                tracing::info!(%tasks, %urls, "Finished collecting image URLs");
            }
            GrabEvent::DownloadQueued { task, url, proxy } => {
                tracing::debug!(%task, %url, ?proxy, "Download queued");
            }
            GrabEvent::Saved { url, path } => {
                tracing::debug!(%url, path = %path.display(), "Image saved");
            }
            GrabEvent::Finished { saved, elapsed } => {
                tracing::info!(%saved, ?elapsed, "Image grabber job complete");
            }
            GrabEvent::StopRequested => {
                tracing::info!("Stop requested, cancelling outstanding tasks");
            }
        }
    }
}
