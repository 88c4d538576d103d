//! End-to-end pipeline tests: mock catalog in, playlist file out

use crate::common::{catalog_template, config_from, mount_catalog_page, mount_film, single_item_page};
use std::path::Path;
use stream_harvest::playlist::parse_playlist;
use stream_harvest::{run_pipeline, Config, PipelineError};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline_config(server: &MockServer, playlist: &Path, extra: &str) -> Config {
    config_from(&format!(
        r#"
[source]
name = "movies"
kind = "json"
page-url = "{template}"

[http]
timeout-secs = 5
connect-timeout-secs = 2
retry-delay-ms = 10

[playlist]
path = "{playlist}"
user-agent = "okhttp/4.12.0"
referrer = "https://ref.example/"

[orchestrator]
entry-delay-secs = 0.0

{extra}
"#,
        template = catalog_template(server),
        playlist = playlist.display(),
        extra = extra,
    ))
}

#[tokio::test]
async fn test_end_to_end_playlist() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("out").join("movies.m3u");

    mount_catalog_page(
        &server,
        0,
        r#"[{"id":"7","title":"X","year":"2020","sources":[{"url":"http://h/a.m3u8","quality":"720p"}]}]"#,
    )
    .await;
    mount_catalog_page(&server, 1, "[]").await;

    let config = pipeline_config(&server, &playlist, "");
    let summary = run_pipeline(config, CancellationToken::new()).await.unwrap();

    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.streams, 1);
    assert_eq!(summary.pages, 2);

    let content = std::fs::read_to_string(&playlist).unwrap();
    assert_eq!(
        content,
        "#EXTM3U\n\
         #EXTINF:-1 tvg-id=\"7\" tvg-logo=\"\" tvg-name=\"X\",X (2020) [720p]\n\
         #EXTVLCOPT:http-user-agent=okhttp/4.12.0\n\
         #EXTVLCOPT:http-referrer=https://ref.example/\n\
         http://h/a.m3u8\n"
    );
}

#[tokio::test]
async fn test_abandoned_entry_does_not_stop_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("movies.m3u");
    let report = dir.path().join("report.md");

    let uri = server.uri();
    mount_catalog_page(
        &server,
        0,
        &format!(
            r#"[
                {{"id":"a","title":"A","link":"{uri}/film/a/"}},
                {{"id":"broken","title":"Broken","link":"{uri}/film/broken/"}},
                {{"id":"c","title":"C","sources":[{{"url":"http://cdn.example/c.m3u8"}}]}}
            ]"#
        ),
    )
    .await;
    mount_catalog_page(&server, 1, "[]").await;

    mount_film(&server, "a", "vid-a", "https://cdn.example/a/master.m3u8").await;
    Mock::given(method("GET"))
        .and(path("/film/broken/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let extra = format!(
        r#"
[resolver.multi-hop]
video-id-selector = "div.alternative-links button.alternative-link"
indirection-url = "{uri}/video/{{id}}/"
title-selector = "h1.section-title"
"#
    );
    let mut config = pipeline_config(&server, &playlist, &extra);
    config.playlist.report_path = Some(report.display().to_string());

    let summary = run_pipeline(config, CancellationToken::new()).await.unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].entry_id, "broken");

    let content = std::fs::read_to_string(&playlist).unwrap();
    let records = parse_playlist(&content, "Unknown").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].url, "https://cdn.example/a/master.m3u8");
    assert_eq!(records[0].title, "A");
    assert!(records[0]
        .options
        .contains(&format!("http-referrer={}/embed/vid-a", uri)));
    assert_eq!(records[1].url, "http://cdn.example/c.m3u8");

    let report = std::fs::read_to_string(&report).unwrap();
    assert!(report.contains("| broken | Broken | detail |"));
}

#[tokio::test]
async fn test_first_page_failure_writes_empty_playlist() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("movies.m3u");

    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = pipeline_config(&server, &playlist, "");
    let result = run_pipeline(config, CancellationToken::new()).await;

    assert!(matches!(result, Err(PipelineError::Crawl(_))));
    assert_eq!(std::fs::read_to_string(&playlist).unwrap(), "#EXTM3U\n");
}

#[tokio::test]
async fn test_empty_catalog_is_not_an_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("movies.m3u");

    mount_catalog_page(&server, 0, "[]").await;

    let config = pipeline_config(&server, &playlist, "");
    let summary = run_pipeline(config, CancellationToken::new()).await.unwrap();

    assert!(summary.is_empty_catalog());
    assert_eq!(std::fs::read_to_string(&playlist).unwrap(), "#EXTM3U\n");
}

#[tokio::test]
async fn test_page_limit_override() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("movies.m3u");

    mount_catalog_page(&server, 0, &single_item_page("1")).await;
    mount_catalog_page(&server, 1, &single_item_page("2")).await;

    let mut config = pipeline_config(&server, &playlist, "");
    config.source.max_pages = Some(2);

    let summary = run_pipeline(config, CancellationToken::new()).await.unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.resolved, 2);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("movies.m3u");

    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let config = pipeline_config(&server, &playlist, "");
    let summary = run_pipeline(config, token).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(std::fs::read_to_string(&playlist).unwrap(), "#EXTM3U\n");
}
