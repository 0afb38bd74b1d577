//! Random proxy rotation
//!
//! Every task draws its proxy independently and uniformly from the pool.

use rand::seq::IndexedRandom;
use std::sync::Arc;

/// Read-only pool of proxy URLs a run rotates through
///
/// An empty pool is valid and means every request goes out directly.
#[derive(Debug, Clone)]
pub struct ProxyPool {
    proxies: Arc<[String]>,
}

impl ProxyPool {
    pub fn new(proxies: Vec<String>) -> Self {
        Self {
            proxies: proxies.into(),
        }
    }

    /// Picks one proxy uniformly at random, `None` when the pool is empty
    ///
    /// Each call draws from the calling thread's generator, so the pool can
    /// be shared freely between tasks.
    pub fn pick(&self) -> Option<&str> {
        self.proxies.choose(&mut rand::rng()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl Default for ProxyPool {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
