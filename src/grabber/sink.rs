//! Error sinks
//!
//! Failed tasks do not abort a run. Each failure is handed to an
//! [`ErrorSink`] exactly once, possibly from several worker threads at the
//! same time.

use crate::{ErrorKind, GrabError};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Receives one error per failed task
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: GrabError);
}

/// Sink that logs every error through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: GrabError) {
        tracing::warn!(kind = %error.kind(), "{}", error);
    }
}

/// Sink that logs every error and counts them per kind
#[derive(Debug, Default)]
pub struct TallyErrorSink {
    counts: Mutex<BTreeMap<ErrorKind, u64>>,
}

impl TallyErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counts so far
    pub fn counts(&self) -> BTreeMap<ErrorKind, u64> {
        self.counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn total(&self) -> u64 {
        self.counts().values().sum()
    }
}

impl ErrorSink for TallyErrorSink {
    fn report(&self, error: GrabError) {
        let kind = error.kind();
        TracingErrorSink.report(error);
        *self
            .counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(kind)
            .or_insert(0) += 1;
    }
}

/// Sink that keeps every error it receives
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    errors: Mutex<Vec<GrabError>>,
}

impl CollectingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kinds of the collected errors, in arrival order
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.lock().iter().map(GrabError::kind).collect()
    }

    /// Removes and returns everything collected so far
    pub fn take(&self) -> Vec<GrabError> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GrabError>> {
        self.errors.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&self, error: GrabError) {
        self.lock().push(error);
    }
}
