//! HTTP client construction
//!
//! Every task fetches through a client bound to the proxy it was assigned.
//! Clients are built lazily, once per distinct proxy, and shared by sources
//! and the downloader for the lifetime of a run.

use reqwest::{Client, Proxy};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Settings shared by every client of a run
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Kept short so dead proxies fail fast
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("image-grabber/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Builds an HTTP client, optionally routed through a proxy
///
/// # Arguments
///
/// * `settings` - User agent and timeouts
/// * `proxy` - Proxy URL (`http://`, `https://`, `socks5://`), `None` for direct
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - The proxy URL was rejected or the TLS backend failed
pub fn build_http_client(settings: &HttpSettings, proxy: Option<&str>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// Lazily built clients, one per proxy
pub struct HttpClients {
    settings: HttpSettings,
    clients: Mutex<HashMap<Option<String>, Client>>,
}

impl HttpClients {
    pub fn new(settings: HttpSettings) -> Self {
        Self {
            settings,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Returns the client for `proxy`, building it on first use
    pub fn get(&self, proxy: Option<&str>) -> Result<Client, reqwest::Error> {
        let key = proxy.map(str::to_owned);
        let mut clients = self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        tracing::debug!(proxy = ?proxy, "Building HTTP client");
        let client = build_http_client(&self.settings, proxy)?;
        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Number of distinct clients built so far
    pub fn len(&self) -> usize {
        self.clients
            .lock()
            .map(|clients| clients.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HttpClients {
    fn default() -> Self {
        Self::new(HttpSettings::default())
    }
}
