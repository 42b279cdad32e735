//! End-to-end tests of the three bridge requests against a saved archive page

use std::sync::Arc;
use std::time::Duration;
use takeout_harvester::bridge::{PageAgent, Request, Response};
use takeout_harvester::config::{parse_config, Config};
use takeout_harvester::dispatcher::{BatchDispatcher, RecordingTrigger};
use takeout_harvester::page::PageSnapshot;
use url::Url;

const ARCHIVE_PAGE: &str = include_str!("../fixtures/takeout_archive.html");

fn archive_page() -> PageSnapshot {
    PageSnapshot::parse(
        ARCHIVE_PAGE,
        Url::parse("https://takeout.google.com/manage/archive/a1b2c3d4").expect("valid URL"),
    )
}

fn create_agent(config: &Config) -> (PageAgent, Arc<RecordingTrigger>) {
    let trigger = Arc::new(RecordingTrigger::new());
    let dispatcher = BatchDispatcher::new(&config.dispatcher, trigger.clone());
    (PageAgent::new(config, dispatcher), trigger)
}

#[test]
fn test_find_links_on_archive_page() {
    let (agent, _) = create_agent(&Config::default());
    let mut page = archive_page();

    assert_eq!(page.anchors().len(), 155);

    let response = agent.handle(&mut page, Request::FindLinks);
    let Response::Links(found) = response else {
        panic!("findLinks must return the link listing");
    };

    assert_eq!(found.count, 131);
    assert_eq!(found.downloaded, 54);
    assert_eq!(found.to_download, 77);
    assert_eq!(found.links.len(), 131);

    // Document order, raw hrefs
    assert!(found.links[0].url.ends_with("i=0&user=104857"));
    assert!(found.links[130].url.ends_with("i=130&user=104857"));
    assert!(found.links.iter().all(|l| l.text == "Descargar"));
}

#[test]
fn test_find_links_json_contract() {
    let (agent, _) = create_agent(&Config::default());
    let mut page = archive_page();

    let reply = agent
        .handle_json(&mut page, r#"{"action":"findLinks"}"#)
        .expect("findLinks succeeds");
    let value: serde_json::Value = serde_json::from_str(&reply).expect("valid JSON");

    assert_eq!(value["count"], 131);
    assert_eq!(value["downloaded"], 54);
    assert_eq!(value["toDownload"], 77);
    assert_eq!(value["links"].as_array().map(Vec::len), Some(131));
    assert!(value["links"][0].get("element").is_none());
}

#[test]
fn test_classification_is_repeatable() {
    let (agent, _) = create_agent(&Config::default());
    let page = archive_page();

    assert_eq!(agent.find_links(&page), agent.find_links(&page));
}

#[test]
fn test_highlight_links_on_archive_page() {
    let (agent, _) = create_agent(&Config::default());
    let mut page = archive_page();

    let response = agent.handle(&mut page, Request::HighlightLinks);

    assert_eq!(response.count(), 131);
    assert_eq!(page.highlighted_count(), 131);
}

#[tokio::test(start_paused = true)]
async fn test_download_all_on_archive_page() {
    let (agent, trigger) = create_agent(&Config::default());
    let mut page = archive_page();
    let start = tokio::time::Instant::now();

    let response = agent.handle(&mut page, Request::DownloadAll);
    assert_eq!(response.count(), 77);

    agent.wait_for_downloads().await;

    let fired = trigger.fired();
    assert_eq!(fired.len(), 77);

    let last_at = fired[76].0;
    let elapsed = last_at - start;
    assert!(elapsed >= Duration::from_secs(76) && elapsed <= Duration::from_millis(76_001));

    let expected: Vec<_> = agent
        .find_links(&page)
        .links
        .into_iter()
        .filter(|l| !l.downloaded)
        .map(|l| l.url)
        .collect();
    let fired_urls: Vec<_> = trigger.urls().iter().map(|u| u.to_string()).collect();
    assert_eq!(fired_urls, expected);
}

#[tokio::test(start_paused = true)]
async fn test_download_all_with_custom_interval() {
    let config = parse_config("[dispatcher]\ninterval-ms = 250\n").expect("valid config");
    let (agent, trigger) = create_agent(&config);
    let mut page = archive_page();
    let start = tokio::time::Instant::now();

    agent.handle(&mut page, Request::DownloadAll);
    agent.wait_for_downloads().await;

    let last_at = trigger.fired()[76].0;
    let elapsed = last_at - start;
    assert!(elapsed >= Duration::from_millis(19_000) && elapsed <= Duration::from_millis(19_001));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_stops_remaining_downloads() {
    let (agent, trigger) = create_agent(&Config::default());
    let mut page = archive_page();

    agent.handle(&mut page, Request::DownloadAll);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(agent.dispatcher().cancel_all(), 74);
    agent.wait_for_downloads().await;

    assert_eq!(trigger.fired().len(), 3);
}

#[test]
fn test_legacy_heuristics_find_nothing() {
    let html = r#"<html><body>
        <a href="https://takeout.google.com/download/abc">Download</a>
        <a href="/takeout/download?j=1">Descargar</a>
        <a href="/other" class="download">download archive</a>
    </body></html>"#;
    let (agent, _) = create_agent(&Config::default());
    let page = PageSnapshot::parse(
        html,
        Url::parse("https://takeout.google.com/manage/archive").expect("valid URL"),
    );

    assert_eq!(agent.find_links(&page).count, 0);
}
