//! Image sources
//!
//! A source turns a keyword, an optional proxy, and a page index into a
//! list of image URLs. The pipeline treats every source as an opaque
//! [`Source`]; the sites themselves are described as data ([`SourceSpec`])
//! and interpreted by one generic engine ([`HtmlSource`]).

mod html;
pub mod presets;
mod spec;

pub use html::HtmlSource;
pub use spec::{ExtractionRule, SourceSpec};

use crate::Result;
use async_trait::async_trait;

/// Discovery capability of one image site
///
/// Implementations must be safe to call concurrently with different
/// arguments. A page that loads but yields no images is reported as
/// [`crate::GrabError::NoResults`], distinct from transport failures.
#[async_trait]
pub trait Source: Send + Sync {
    /// Name used in logs and error reports
    fn name(&self) -> &str;

    /// Returns the distinct image URLs found on one result page
    ///
    /// # Arguments
    ///
    /// * `keyword` - The search keyword
    /// * `proxy` - Proxy URL to route through, `None` for a direct connection
    /// * `page` - Zero-based result page index
    async fn discover(&self, keyword: &str, proxy: Option<&str>, page: u32) -> Result<Vec<String>>;
}
