//! Grabber orchestration - the two-phase discovery/download pipeline
//!
//! A run goes through two strictly separated phases on one worker pool:
//!
//! 1. Discovery: one task per (source, keyword, page), submitted in
//!    source-major order with a pacing delay before each submission.
//!    Every task must finish before the next phase begins.
//! 2. Download: one task per discovered URL, paced the same way.
//!
//! Results travel back to the orchestrator over a channel; failures go to
//! the error sink and are left out of the result.

use crate::grabber::pool::WorkerPool;
use crate::grabber::{DelayRange, Downloader, ErrorSink, GrabEvent, GrabReporter, ProxyPool};
use crate::source::Source;
use crate::{GrabError, Result};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Construction parameters of a [`Grabber`]
#[derive(Debug, Clone)]
pub struct GrabberSettings {
    /// Upper bound on tasks running at once
    pub max_concurrency: usize,
    /// Result pages requested per keyword per source
    pub page_depth: u32,
    pub keywords: Vec<String>,
    /// Proxy URLs, empty for direct connections
    pub proxies: Vec<String>,
    pub target_dir: PathBuf,
    pub delay: DelayRange,
}

/// Lifecycle of a grabber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    Created,
    DiscoveringUrls,
    DownloadingImages,
    Completed,
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct GrabOutcome {
    /// Saved file paths, in completion order
    pub saved: Vec<PathBuf>,
    pub discovery_tasks: usize,
    /// URLs handed to the download phase
    pub discovered_urls: usize,
    pub download_tasks: usize,
    pub elapsed: Duration,
}

/// One discovery task: a source, a keyword and a page index
struct DiscoveryTask {
    source_index: usize,
    source: Arc<dyn Source>,
    keyword: String,
    page: u32,
    proxy: Option<String>,
}

/// Drives discovery and download for a fixed set of sources and keywords
pub struct Grabber {
    settings: GrabberSettings,
    sources: Vec<Arc<dyn Source>>,
    downloader: Arc<dyn Downloader>,
    proxies: ProxyPool,
    errors: Arc<dyn ErrorSink>,
    reporter: Option<Arc<dyn GrabReporter>>,
    cancel: CancellationToken,
    state: Mutex<GrabState>,
}

impl Grabber {
    /// Creates a new grabber
    ///
    /// # Arguments
    ///
    /// * `settings` - Pipeline shape, keywords, proxies, target directory and pacing
    /// * `sources` - Discovery capabilities, queried in the given order
    /// * `downloader` - Fetches and stores each discovered URL
    /// * `errors` - Receives one error per failed task
    pub fn new(
        settings: GrabberSettings,
        sources: Vec<Arc<dyn Source>>,
        downloader: Arc<dyn Downloader>,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        let proxies = ProxyPool::new(settings.proxies.clone());
        Self {
            settings,
            sources,
            downloader,
            proxies,
            errors,
            reporter: None,
            cancel: CancellationToken::new(),
            state: Mutex::new(GrabState::Created),
        }
    }

    /// Attaches a reporter that receives progress events
    pub fn with_reporter(mut self, reporter: Arc<dyn GrabReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn settings(&self) -> &GrabberSettings {
        &self.settings
    }

    pub fn state(&self) -> GrabState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Names of the configured sources, in query order
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Number of discovery tasks a run submits
    pub fn planned_discovery_tasks(&self) -> usize {
        self.sources.len() * self.settings.keywords.len() * self.settings.page_depth as usize
    }

    /// Cancels the run
    ///
    /// Tasks not yet started fail with [`GrabError::Cancelled`], tasks in
    /// flight race their network call against the cancellation and lose.
    /// Both phase barriers still complete. Safe to call any number of times,
    /// before or during [`Grabber::grab`].
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            self.emit(GrabEvent::StopRequested);
        }
        self.cancel.cancel();
    }

    /// Runs the pipeline and returns the paths of all saved images
    ///
    /// Never fails: failed tasks are reported to the error sink and simply
    /// missing from the result. Order follows completion, not submission.
    pub async fn grab(&self) -> Vec<PathBuf> {
        self.grab_detailed().await.saved
    }

    /// Runs the pipeline and returns the saved paths along with run counters
    pub async fn grab_detailed(&self) -> GrabOutcome {
        let started = Instant::now();
        self.emit(GrabEvent::Started {
            sources: self.sources.len(),
            keywords: self.settings.keywords.len(),
            page_depth: self.settings.page_depth,
            proxies: self.proxies.len(),
        });

        let mut pool = WorkerPool::new(self.settings.max_concurrency);

        self.set_state(GrabState::DiscoveringUrls);
        let (urls, discovery_tasks) = self.discover_urls(&mut pool).await;
        self.emit(GrabEvent::DiscoveryFinished {
            tasks: discovery_tasks,
            urls: urls.len(),
        });

        self.set_state(GrabState::DownloadingImages);
        let discovered_urls = urls.len();
        let (saved, download_tasks) = self.download_images(&mut pool, urls).await;

        self.set_state(GrabState::Completed);
        let elapsed = started.elapsed();
        self.emit(GrabEvent::Finished {
            saved: saved.len(),
            elapsed,
        });

        GrabOutcome {
            saved,
            discovery_tasks,
            discovered_urls,
            download_tasks,
            elapsed,
        }
    }

    /// Discovery phase: submits every (source, keyword, page) task and
    /// waits for all of them
    async fn discover_urls(&self, pool: &mut WorkerPool) -> (Vec<String>, usize) {
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Vec<String>)>();
        let mut submitted = 0;

        for (source_index, source) in self.sources.iter().enumerate() {
            for keyword in &self.settings.keywords {
                for page in 0..self.settings.page_depth {
                    self.pace().await;

                    let task = DiscoveryTask {
                        source_index,
                        source: Arc::clone(source),
                        keyword: keyword.clone(),
                        page,
                        proxy: self.proxies.pick().map(str::to_owned),
                    };
                    self.emit(GrabEvent::DiscoveryQueued {
                        task: submitted,
                        source: source.name(),
                        keyword,
                        page,
                        proxy: task.proxy.as_deref(),
                    });

                    let tx = tx.clone();
                    let cancel = self.cancel.clone();
                    let errors = Arc::clone(&self.errors);
                    pool.submit(async move {
                        let work = task
                            .source
                            .discover(&task.keyword, task.proxy.as_deref(), task.page);
                        match until_cancelled(&cancel, work).await {
                            Ok(urls) => {
                                let _ = tx.send((task.source_index, urls));
                            }
                            Err(e) => errors.report(e),
                        }
                    });
                    submitted += 1;
                }
            }
        }

        pool.drain().await;
        drop(tx);

        let mut found = Vec::new();
        while let Some(result) = rx.recv().await {
            found.push(result);
        }

        (aggregate_urls(self.sources.len(), found), submitted)
    }

    /// Download phase: submits one task per URL and waits for all of them
    async fn download_images(&self, pool: &mut WorkerPool, urls: Vec<String>) -> (Vec<PathBuf>, usize) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PathBuf>();
        let mut submitted = 0;

        for url in urls {
            self.pace().await;

            let proxy = self.proxies.pick().map(str::to_owned);
            self.emit(GrabEvent::DownloadQueued {
                task: submitted,
                url: &url,
                proxy: proxy.as_deref(),
            });

            let tx = tx.clone();
            let cancel = self.cancel.clone();
            let errors = Arc::clone(&self.errors);
            let downloader = Arc::clone(&self.downloader);
            let reporter = self.reporter.clone();
            let target_dir = self.settings.target_dir.clone();
            pool.submit(async move {
                let work = downloader.download(&url, &target_dir, proxy.as_deref());
                match until_cancelled(&cancel, work).await {
                    Ok(path) => {
                        if let Some(reporter) = &reporter {
                            reporter.report(GrabEvent::Saved { url: &url, path: &path });
                        }
                        let _ = tx.send(path);
                    }
                    Err(e) => errors.report(e),
                }
            });
            submitted += 1;
        }

        pool.drain().await;
        drop(tx);

        let mut saved = Vec::new();
        while let Some(path) = rx.recv().await {
            if !path.as_os_str().is_empty() {
                saved.push(path);
            }
        }

        (saved, submitted)
    }

    /// Consumes one pacing delay, skipped once the run is cancelled
    async fn pace(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        tokio::select! {
            _ = self.settings.delay.pause() => {}
            _ = self.cancel.cancelled() => {}
        }
    }

    fn set_state(&self, state: GrabState) {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    fn emit(&self, event: GrabEvent<'_>) {
        if let Some(reporter) = &self.reporter {
            reporter.report(event);
        }
    }
}

/// Runs `work` unless `cancel` fires first
///
/// The token is checked before the work starts and raced against it while
/// it runs. A panic inside `work` comes back as [`GrabError::Panicked`] so
/// the task is still reported.
async fn until_cancelled<T, F>(cancel: &CancellationToken, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(GrabError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GrabError::Cancelled),
        caught = AssertUnwindSafe(work).catch_unwind() => {
            caught.unwrap_or_else(|payload| Err(GrabError::Panicked {
                message: panic_message(payload.as_ref()),
            }))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Flattens discovery results into the download list
///
/// Empty strings are dropped and each source's URLs are deduplicated across
/// all of that source's tasks. The same URL from two different sources is
/// kept twice.
fn aggregate_urls(source_count: usize, results: Vec<(usize, Vec<String>)>) -> Vec<String> {
    let mut seen: Vec<HashSet<String>> = vec![HashSet::new(); source_count];
    let mut urls = Vec::new();

    for (source_index, found) in results {
        let Some(seen) = seen.get_mut(source_index) else {
            continue;
        };
        for url in found {
            if !url.is_empty() && seen.insert(url.clone()) {
                urls.push(url);
            }
        }
    }

    urls
}
