//! Declarative source definitions and image extraction
//!
//! A [`SourceSpec`] describes a site as data: how to build the URL of a
//! result page and which attribute of which elements holds an image URL.
//! [`ExtractionRule`] is the compiled form used to pull image URLs out of a
//! fetched page.

use crate::ConfigError;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

fn default_attribute() -> String {
    "src".to_string()
}

/// Data description of one image source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSpec {
    /// Name used in logs and error reports
    pub name: String,

    /// Result page template with `{keyword}` and `{page}` placeholders
    pub page_url: String,

    /// CSS selector matching the elements that carry image URLs
    pub selector: String,

    /// Attribute read from each matched element
    #[serde(default = "default_attribute")]
    pub attribute: String,

    /// Raw attribute values that are never images (placeholders, spacers)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// When non-empty, only values containing one of these are kept, cut
    /// right after the extension
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Added to the zero-based page index when rendering `{page}`
    #[serde(default)]
    pub page_offset: u32,
}

impl SourceSpec {
    /// Creates a spec reading the `src` attribute with no filters
    pub fn new(name: impl Into<String>, page_url: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page_url: page_url.into(),
            selector: selector.into(),
            attribute: default_attribute(),
            exclude: Vec::new(),
            extensions: Vec::new(),
            page_offset: 0,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn with_exclude(mut self, values: &[&str]) -> Self {
        self.exclude = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_page_offset(mut self, offset: u32) -> Self {
        self.page_offset = offset;
        self
    }

    /// Renders the result page URL for a keyword and zero-based page index
    ///
    /// The keyword is form-urlencoded so that spaces and reserved characters
    /// survive inside both paths and query strings.
    pub fn page_url(&self, keyword: &str, page: u32) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
        let page_number = page.saturating_add(self.page_offset);
        self.page_url
            .replace("{keyword}", &encoded)
            .replace("{page}", &page_number.to_string())
    }

    /// Compiles the extraction part of this spec
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractionRule)` - The selector parsed successfully
    /// * `Err(ConfigError::InvalidSelector)` - The selector is not valid CSS
    pub fn extraction_rule(&self) -> Result<ExtractionRule, ConfigError> {
        let selector = Selector::parse(&self.selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} ({}): {:?}", self.selector, self.name, e))
        })?;

        Ok(ExtractionRule {
            selector,
            attribute: self.attribute.clone(),
            exclude: self.exclude.clone(),
            extensions: self.extensions.clone(),
        })
    }
}

/// Compiled extraction rule of a [`SourceSpec`]
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    selector: Selector,
    attribute: String,
    exclude: Vec<String>,
    extensions: Vec<String>,
}

impl ExtractionRule {
    /// Extracts distinct absolute image URLs from an HTML page
    ///
    /// # Extraction Rules
    ///
    /// - Only elements matching the selector and carrying the attribute count
    /// - Blank values and values listed in `exclude` are skipped
    /// - With `extensions` set, a value yields one candidate per extension it
    ///   contains, truncated right after that extension
    /// - Candidates are resolved against `base_url`; anything that does not
    ///   end up as an http(s) URL is dropped
    /// - Duplicates are removed, first occurrence wins
    ///
    /// # Arguments
    ///
    /// * `html` - The page content
    /// * `base_url` - The URL the page was served from
    pub fn extract(&self, html: &str, base_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut images = Vec::new();

        for element in document.select(&self.selector) {
            let Some(raw) = element.value().attr(&self.attribute) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() || self.exclude.iter().any(|e| e == raw) {
                continue;
            }

            for candidate in self.candidates(raw) {
                if let Some(absolute) = resolve_image_url(candidate, base_url) {
                    if seen.insert(absolute.clone()) {
                        images.push(absolute);
                    }
                }
            }
        }

        images
    }

    fn candidates<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        if self.extensions.is_empty() {
            return vec![raw];
        }

        self.extensions
            .iter()
            .filter_map(|ext| raw.find(ext.as_str()).map(|pos| &raw[..pos + ext.len()]))
            .collect()
    }
}

/// Resolves an attribute value to an absolute http(s) URL
///
/// Returns None for `javascript:`, `data:` and other non-HTTP schemes, and
/// for values that cannot be resolved at all.
fn resolve_image_url(value: &str, base_url: &Url) -> Option<String> {
    if value.starts_with('#') {
        return None;
    }

    let absolute = base_url.join(value).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute.to_string())
    } else {
        None
    }
}
