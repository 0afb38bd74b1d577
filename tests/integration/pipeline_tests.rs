//! End-to-end grabs against a mock image site

use image_grabber::config::parse_config;
use image_grabber::grabber::{build_grabber, CollectingErrorSink, GrabState, TallyErrorSink};
use image_grabber::{ConfigError, ErrorKind};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a config with one custom source pointed at the mock server
fn test_config(base_url: &str, target_dir: &Path, keywords: &[&str], page_depth: u32) -> String {
    let keywords = keywords
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
[grabber]
max-concurrency = 4
page-depth = {page_depth}
target-dir = "{target}"
keywords = [{keywords}]

[delay]
min-ms = 0
max-ms = 5

[http]
request-timeout-ms = 5000

[[source]]
name = "mock"
page-url = "{base_url}/search?q={{keyword}}&page={{page}}"
selector = "img.result"
"#,
        page_depth = page_depth,
        target = target_dir.display(),
        keywords = keywords,
        base_url = base_url,
    )
}

async fn mount_site(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "cat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <img class="result" src="/img/cat-1.jpg">
            <img class="result" src="/img/cat-2.jpg">
            <img class="result" src="/img/missing.jpg">
            </body></html>"#,
        ))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "dog"))
        .respond_with(ResponseTemplate::new(404))
        .mount(mock_server)
        .await;

    for name in ["cat-1.jpg", "cat-2.jpg"] {
        Mock::given(method("GET"))
            .and(path(format!("/img/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("bytes of {}", name)))
            .mount(mock_server)
            .await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_grab_with_partial_failures() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();

    let config = parse_config(&test_config(&mock_server.uri(), dir.path(), &["cat", "dog"], 2)).unwrap();
    let tally = Arc::new(TallyErrorSink::new());
    let grabber = build_grabber(&config, tally.clone()).unwrap();

    let outcome = grabber.grab_detailed().await;

    // Both "cat" pages return the same three URLs; they are fetched once each
    assert_eq!(outcome.discovery_tasks, 4);
    assert_eq!(outcome.discovered_urls, 3);
    assert_eq!(outcome.download_tasks, 3);

    let saved: HashSet<_> = outcome.saved.iter().cloned().collect();
    assert_eq!(
        saved,
        HashSet::from([dir.path().join("cat-1.jpg"), dir.path().join("cat-2.jpg")])
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("cat-2.jpg")).unwrap(),
        "bytes of cat-2.jpg"
    );

    // Two "dog" pages plus one missing image
    let counts = tally.counts();
    assert_eq!(counts.get(&ErrorKind::EmptyResponse), Some(&3));
    assert_eq!(tally.total(), 3);
    assert_eq!(grabber.state(), GrabState::Completed);
}

#[tokio::test]
async fn test_stopped_grab_makes_no_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let config = parse_config(&test_config(&mock_server.uri(), dir.path(), &["cat", "dog", "owl"], 2)).unwrap();
    let errors = Arc::new(CollectingErrorSink::new());
    let grabber = build_grabber(&config, errors.clone()).unwrap();

    grabber.stop();
    let saved = grabber.grab().await;

    assert!(saved.is_empty());
    assert_eq!(errors.len(), 3 * 2);
    assert!(errors.kinds().iter().all(|k| *k == ErrorKind::Cancelled));
    assert!(!dir.path().join("cat-1.jpg").exists());
}

const PRESET_CONFIG: &str = r#"
[grabber]
max-concurrency = 1
page-depth = 1
target-dir = "./images"
keywords = ["cat"]

[delay]
min-ms = 0
max-ms = 0

[[source]]
preset = "PRESET"
"#;

#[test]
fn test_preset_source_builds() {
    let config = parse_config(&PRESET_CONFIG.replace("PRESET", "pixabay")).unwrap();

    let grabber = build_grabber(&config, Arc::new(CollectingErrorSink::new())).unwrap();

    assert_eq!(grabber.source_names(), vec!["pixabay"]);
    assert_eq!(grabber.planned_discovery_tasks(), 1);
    assert_eq!(grabber.state(), GrabState::Created);
}

#[test]
fn test_unknown_preset_is_rejected() {
    let result = parse_config(&PRESET_CONFIG.replace("PRESET", "flickr"));
    assert!(matches!(result, Err(ConfigError::UnknownPreset(name)) if name == "flickr"));
}
