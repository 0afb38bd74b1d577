use crate::config::types::{Config, DelayConfig, GrabberConfig, HttpConfig, SourceEntry};
use crate::source::{presets, SourceSpec};
use crate::ConfigError;
use url::Url;

/// Largest worker pool a configuration may ask for
const MAX_CONCURRENCY: u32 = 256;

/// Proxy schemes reqwest can route through
const PROXY_SCHEMES: [&str; 4] = ["http", "https", "socks5", "socks5h"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_grabber_config(&config.grabber)?;
    validate_delay_config(&config.delay)?;
    validate_http_config(&config.http)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates pipeline shape, keywords and proxies
fn validate_grabber_config(config: &GrabberConfig) -> Result<(), ConfigError> {
    // page_depth >= 0 is always true for u32, so no check needed

    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrency
        )));
    }

    if config.target_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target_dir cannot be empty".to_string(),
        ));
    }

    if config.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords cannot contain blank entries".to_string(),
        ));
    }

    for proxy in &config.proxies {
        validate_proxy(proxy)?;
    }

    Ok(())
}

/// Validates a single proxy URL
fn validate_proxy(proxy: &str) -> Result<(), ConfigError> {
    let url = Url::parse(proxy)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;

    if !PROXY_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy '{}' must use one of the schemes {:?}",
            proxy, PROXY_SCHEMES
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy '{}' has no host",
            proxy
        )));
    }

    Ok(())
}

fn validate_delay_config(config: &DelayConfig) -> Result<(), ConfigError> {
    if config.min_ms > config.max_ms {
        return Err(ConfigError::Validation(format!(
            "delay min-ms ({}) must not exceed max-ms ({})",
            config.min_ms, config.max_ms
        )));
    }
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.connect_timeout_ms == 0 || config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "HTTP timeouts must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates `[[source]]` entries
fn validate_sources(sources: &[SourceEntry]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[source]] entry is required".to_string(),
        ));
    }

    for entry in sources {
        match entry {
            SourceEntry::Preset { preset } => {
                if presets::by_name(preset).is_none() {
                    return Err(ConfigError::UnknownPreset(preset.clone()));
                }
            }
            SourceEntry::Custom(spec) => validate_source_spec(spec)?,
        }
    }

    Ok(())
}

/// Validates a declarative source definition
pub(crate) fn validate_source_spec(spec: &SourceSpec) -> Result<(), ConfigError> {
    if spec.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    if !spec.page_url.contains("{page}") && !spec.page_url.contains("{keyword}") {
        return Err(ConfigError::Validation(format!(
            "page-url of source '{}' must contain {{page}} or {{keyword}}",
            spec.name
        )));
    }

    // Render with sample values so the template is checked as a real URL
    let sample = spec.page_url("sample", 0);
    let url = Url::parse(&sample).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid page-url of source '{}': {}", spec.name, e))
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "page-url of source '{}' must use http or https",
            spec.name
        )));
    }

    if spec.attribute.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "attribute of source '{}' cannot be empty",
            spec.name
        )));
    }

    spec.extraction_rule()?;

    Ok(())
}
