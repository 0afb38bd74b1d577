//! HttpDownloader against a mock image host

use image_grabber::grabber::{Downloader, HttpClients, HttpDownloader};
use image_grabber::{ErrorKind, GrabError};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

fn downloader() -> HttpDownloader {
    HttpDownloader::new(Arc::new(HttpClients::default()))
}

async fn image_server() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/img/photo.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(JPEG_BYTES)
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_download_saves_body_under_last_segment() {
    let mock_server = image_server().await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/img/photo.jpg", mock_server.uri());

    let saved = downloader().download(&url, dir.path(), None).await.unwrap();

    assert_eq!(saved, dir.path().join("photo.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), JPEG_BYTES);
}

#[tokio::test]
async fn test_download_creates_missing_target_dir() {
    let mock_server = image_server().await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("images");
    let url = format!("{}/img/photo.jpg", mock_server.uri());

    let saved = downloader().download(&url, &target, None).await.unwrap();

    assert!(target.is_dir());
    assert!(saved.starts_with(&target));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_downloads_share_missing_dir() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("fresh");
    let downloader = Arc::new(downloader());

    let mut handles = Vec::new();
    for i in 0..8 {
        let downloader = Arc::clone(&downloader);
        let target = target.clone();
        let url = format!("{}/img/{}.jpg", mock_server.uri(), i);
        handles.push(tokio::spawn(async move {
            downloader.download(&url, &target, None).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(std::fs::read_dir(&target).unwrap().count(), 8);
}

#[tokio::test]
async fn test_missing_image_is_empty_response() {
    let mock_server = image_server().await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/img/gone.jpg", mock_server.uri());

    let err = downloader().download(&url, dir.path(), None).await.unwrap_err();

    assert!(matches!(err, GrabError::EmptyResponse { status: 404, .. }));
    assert!(!dir.path().join("gone.jpg").exists());
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Grab a free port and release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();
    let url = format!("http://127.0.0.1:{}/img/photo.jpg", port);

    let err = downloader().download(&url, dir.path(), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_later_download_overwrites_same_name() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first, longer body"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("second"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = downloader();
    let first = format!("{}/a/photo.jpg", mock_server.uri());
    let second = format!("{}/b/photo.jpg", mock_server.uri());

    downloader.download(&first, dir.path(), None).await.unwrap();
    let saved = downloader.download(&second, dir.path(), None).await.unwrap();

    assert_eq!(std::fs::read_to_string(saved).unwrap(), "second");
}
