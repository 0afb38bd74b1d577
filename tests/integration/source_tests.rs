//! HtmlSource against mock result pages

use image_grabber::grabber::{HttpClients, HttpSettings};
use image_grabber::source::{HtmlSource, Source, SourceSpec};
use image_grabber::{ErrorKind, GrabError};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_source(spec: SourceSpec) -> HtmlSource {
    let clients = Arc::new(HttpClients::new(HttpSettings::default()));
    HtmlSource::new(spec, clients).expect("valid spec")
}

#[tokio::test]
async fn test_discovers_images_on_result_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "red fox"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><body>
                    <img class="thumb" src="/img/fox-1.jpg">
                    <img class="thumb" src="{}/img/fox-2.jpg">
                    <img class="thumb" src="/img/fox-1.jpg">
                    <img class="thumb" src="/static/blank.gif">
                    <img class="logo" src="/img/logo.png">
                    </body></html>"#,
                    base_url
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let spec = SourceSpec::new(
        "mock",
        format!("{}/search?q={{keyword}}&page={{page}}", base_url),
        "img.thumb",
    )
    .with_exclude(&["/static/blank.gif"])
    .with_page_offset(1);
    let source = html_source(spec);

    let urls = source.discover("red fox", None, 0).await.unwrap();

    assert_eq!(
        urls,
        vec![
            format!("{}/img/fox-1.jpg", base_url),
            format!("{}/img/fox-2.jpg", base_url),
        ]
    );
}

#[tokio::test]
async fn test_extension_filter_trims_query_strings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <img data-src="/cdn/a.jpg?w=200&h=100">
            <img data-src="/cdn/b.svg">
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let spec = SourceSpec::new("cdn", format!("{}/photos?q={{keyword}}", base_url), "img")
        .with_attribute("data-src")
        .with_extensions(&[".jpg", ".png"]);
    let source = html_source(spec);

    let urls = source.discover("cat", None, 0).await.unwrap();

    assert_eq!(urls, vec![format!("{}/cdn/a.jpg", base_url)]);
}

#[tokio::test]
async fn test_page_without_images_is_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>Nothing here</p></body></html>"))
        .mount(&mock_server)
        .await;

    let spec = SourceSpec::new("empty", format!("{}/search?q={{keyword}}", mock_server.uri()), "img");
    let source = html_source(spec);

    let err = source.discover("unicorn", None, 3).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoResults);
    match err {
        GrabError::NoResults { source_name, keyword, page } => {
            assert_eq!(source_name, "empty");
            assert_eq!(keyword, "unicorn");
            assert_eq!(page, 3);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_error_status_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let spec = SourceSpec::new("down", format!("{}/search?q={{keyword}}", mock_server.uri()), "img");
    let source = html_source(spec);

    let err = source.discover("cat", None, 0).await.unwrap_err();

    assert!(matches!(err, GrabError::EmptyResponse { status: 503, .. }));
}

#[tokio::test]
async fn test_blank_body_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   \n"))
        .mount(&mock_server)
        .await;

    let spec = SourceSpec::new("blank", format!("{}/?q={{keyword}}", mock_server.uri()), "img");
    let source = html_source(spec);

    let err = source.discover("cat", None, 0).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyResponse);
}
