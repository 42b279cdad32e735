//! Page loading over HTTP

use takeout_harvester::config::PageConfig;
use takeout_harvester::page::{build_http_client, load_page, PageSource};
use takeout_harvester::HarvestError;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARCHIVE_PAGE: &str = include_str!("../fixtures/takeout_archive.html");

#[tokio::test]
async fn test_load_remote_page_uses_final_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/manage/archive/a1b2c3d4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(ARCHIVE_PAGE, "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/manage/archive/a1b2c3d4", mock_server.uri()))
        .expect("valid mock URL");
    let client = build_http_client().expect("client builds");

    let page = load_page(&PageSource::Remote(url.clone()), &client, &PageConfig::default())
        .await
        .expect("page loads");

    assert_eq!(page.location(), url);
    assert_eq!(page.anchors().len(), 155);
    assert!(page.is_archive_page("/manage/archive"));
}

#[tokio::test]
async fn test_load_remote_page_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/manage/archive", mock_server.uri())).expect("valid mock URL");
    let client = build_http_client().expect("client builds");

    let result = load_page(&PageSource::Remote(url), &client, &PageConfig::default()).await;

    assert!(matches!(result, Err(HarvestError::Http { .. })));
}

#[tokio::test]
async fn test_load_remote_page_rejects_non_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{}", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/manage/archive", mock_server.uri())).expect("valid mock URL");
    let client = build_http_client().expect("client builds");

    let result = load_page(&PageSource::Remote(url), &client, &PageConfig::default()).await;

    assert!(matches!(result, Err(HarvestError::ContentMismatch { .. })));
}
