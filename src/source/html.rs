use crate::grabber::HttpClients;
use crate::source::{ExtractionRule, Source, SourceSpec};
use crate::{ConfigError, GrabError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Generic source that scrapes image URLs from HTML result pages
///
/// The page to fetch and the elements to read come from a [`SourceSpec`];
/// HTTP goes through the shared [`HttpClients`] cache so each proxy gets one
/// connection pool for the whole run.
pub struct HtmlSource {
    spec: SourceSpec,
    rule: ExtractionRule,
    clients: Arc<HttpClients>,
}

impl HtmlSource {
    /// Creates a source from a spec
    ///
    /// # Returns
    ///
    /// * `Ok(HtmlSource)` - The spec compiled successfully
    /// * `Err(ConfigError::InvalidSelector)` - The spec's selector is invalid
    pub fn new(spec: SourceSpec, clients: Arc<HttpClients>) -> std::result::Result<Self, ConfigError> {
        let rule = spec.extraction_rule()?;
        Ok(Self { spec, rule, clients })
    }

    pub fn spec(&self) -> &SourceSpec {
        &self.spec
    }
}

#[async_trait]
impl Source for HtmlSource {
    fn name(&self) -> &str {
        &self.spec.name
    }

    #[tracing::instrument(skip(self), fields(source = %self.spec.name))]
    async fn discover(&self, keyword: &str, proxy: Option<&str>, page: u32) -> Result<Vec<String>> {
        let page_url = self.spec.page_url(keyword, page);
        tracing::debug!("Fetching result page {}", page_url);

        let transport = |source| GrabError::Transport {
            url: page_url.clone(),
            source,
        };

        let client = self.clients.get(proxy).map_err(transport)?;
        let response = client.get(&page_url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GrabError::EmptyResponse {
                url: page_url,
                status: status.as_u16(),
            });
        }

        let base_url = response.url().clone();
        let html = response.text().await.map_err(transport)?;
        if html.trim().is_empty() {
            return Err(GrabError::EmptyResponse {
                url: page_url,
                status: status.as_u16(),
            });
        }

        let images = self.rule.extract(&html, &base_url);
        tracing::debug!("Found {} images on {}", images.len(), page_url);

        if images.is_empty() {
            return Err(GrabError::NoResults {
                source_name: self.spec.name.clone(),
                keyword: keyword.to_string(),
                page,
            });
        }

        Ok(images)
    }
}
