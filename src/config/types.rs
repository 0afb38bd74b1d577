use crate::source::SourceSpec;
use serde::Deserialize;

/// Main configuration structure for Image Grabber
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub grabber: GrabberConfig,
    pub delay: DelayConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
}

/// Pipeline shape configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GrabberConfig {
    /// Maximum number of tasks running at once
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// Number of result pages requested per keyword per source
    #[serde(rename = "page-depth")]
    pub page_depth: u32,

    /// Directory downloaded images are written into
    #[serde(rename = "target-dir")]
    pub target_dir: String,

    /// Search keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Proxy URLs; an empty list means direct connections
    #[serde(default)]
    pub proxies: Vec<String>,
}

/// Pacing delay consumed before every task submission (milliseconds)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DelayConfig {
    #[serde(rename = "min-ms")]
    pub min_ms: u64,

    #[serde(rename = "max-ms")]
    pub max_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("image-grabber/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_ms: 2_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the markdown run summary, if anywhere
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// A `[[source]]` entry: either a built-in preset or a declarative source
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Preset { preset: String },
    Custom(SourceSpec),
}
