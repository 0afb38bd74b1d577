//! Image downloader
//!
//! Fetches one URL and streams the body into `target_dir/<name>`, where the
//! name is whatever follows the last `/` of the URL. Two URLs that end in
//! the same segment therefore write to the same file, the later one
//! winning.

use crate::grabber::HttpClients;
use crate::{GrabError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Capability that fetches one URL and persists it
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads `url` into `target_dir`, returning the saved path
    async fn download(&self, url: &str, target_dir: &Path, proxy: Option<&str>) -> Result<PathBuf>;
}

/// Returns the file name a URL is stored under
///
/// The name is the text after the last `/`. Returns None when that text is
/// empty or would step outside the target directory (`.` / `..`).
pub fn file_name_for(url: &str) -> Option<&str> {
    let name = url.rsplit('/').next()?;
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Returns the path a URL is stored at inside `target_dir`
pub fn destination_path(url: &str, target_dir: &Path) -> Option<PathBuf> {
    file_name_for(url).map(|name| target_dir.join(name))
}

/// [`Downloader`] backed by reqwest
pub struct HttpDownloader {
    clients: Arc<HttpClients>,
}

impl HttpDownloader {
    pub fn new(clients: Arc<HttpClients>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    /// # Failure Modes
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | URL has no usable final segment | `InvalidFileUrl` |
    /// | Connection or request failure | `Transport` |
    /// | Non-success HTTP status | `EmptyResponse` |
    /// | Directory or file cannot be created/written | `Filesystem` |
    /// | Body stream breaks mid-transfer | `Transport` |
    async fn download(&self, url: &str, target_dir: &Path, proxy: Option<&str>) -> Result<PathBuf> {
        let path = destination_path(url, target_dir).ok_or_else(|| GrabError::InvalidFileUrl {
            url: url.to_string(),
        })?;

        let transport = |source| GrabError::Transport {
            url: url.to_string(),
            source,
        };

        let client = self.clients.get(proxy).map_err(transport)?;
        let mut response = client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        // Error pages are never written to disk
        if !status.is_success() {
            return Err(GrabError::EmptyResponse {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // create_dir_all tolerates the directory appearing concurrently
        fs::create_dir_all(target_dir)
            .await
            .map_err(|source| GrabError::Filesystem {
                path: target_dir.to_path_buf(),
                source,
            })?;

        let filesystem = |source| GrabError::Filesystem {
            path: path.clone(),
            source,
        };

        let mut file = File::create(&path).await.map_err(filesystem)?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            file.write_all(&chunk).await.map_err(filesystem)?;
            written += chunk.len();
        }
        file.flush().await.map_err(filesystem)?;

        tracing::debug!(%url, bytes = written, path = %path.display(), "Download complete");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_last_segment() {
        assert_eq!(file_name_for("https://a.example/x/photo.jpg"), Some("photo.jpg"));
        assert_eq!(
            file_name_for("https://cdn.example/img.png?w=200"),
            Some("img.png?w=200")
        );
    }

    #[test]
    fn test_file_name_rejects_unusable_segments() {
        assert_eq!(file_name_for("https://a.example/x/"), None);
        assert_eq!(file_name_for("https://a.example/x/.."), None);
        assert_eq!(file_name_for("https://a.example/."), None);
    }

    #[test]
    fn test_same_segment_same_destination() {
        let dir = Path::new("/tmp/images");
        assert_eq!(
            destination_path("https://one.example/a/photo.jpg", dir),
            destination_path("https://two.example/b/photo.jpg", dir)
        );
    }

    #[tokio::test]
    async fn test_invalid_file_url_fails_before_network() {
        let downloader = HttpDownloader::new(Arc::new(HttpClients::default()));
        let dir = tempfile::tempdir().unwrap();
        let result = downloader
            .download("https://a.example/gallery/", dir.path(), None)
            .await;
        assert!(matches!(result, Err(GrabError::InvalidFileUrl { .. })));
    }
}
