//! Link resolution tests against mock detail, indirection and player pages

use crate::common::{detail_page, mount_film, test_fetcher};
use stream_harvest::config::{MultiHopConfig, PayloadEncoding};
use stream_harvest::model::{CatalogEntry, SourceHint};
use stream_harvest::resolver::{
    CandidateFilter, LinkResolver, MultiHopChain, ResolveError, SeasonListing, Step,
};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn multi_hop_config(server: &MockServer) -> MultiHopConfig {
    MultiHopConfig {
        video_id_selector: "div.alternative-links button.alternative-link".to_string(),
        video_id_attribute: "data-video".to_string(),
        indirection_url: format!("{}/video/{{id}}/", server.uri()),
        iframe_pattern: r#"data-src=\\?"(https?:\\?/\\?/[^"]+)"#.to_string(),
        payload_pattern: r#"file_link="([^"]+)""#.to_string(),
        payload_encoding: PayloadEncoding::Base64,
        final_referer: None,
        title_selector: Some("h1.section-title".to_string()),
        poster_selector: None,
        poster_attribute: "src".to_string(),
    }
}

fn chain_resolver(server: &MockServer) -> LinkResolver {
    let chain = MultiHopChain::from_config(&multi_hop_config(server)).unwrap();
    LinkResolver::new(test_fetcher(), CandidateFilter::default()).with_chain(chain)
}

#[tokio::test]
async fn test_listed_candidates_need_no_network() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let entry = CatalogEntry::new("7")
        .with_title("X")
        .with_detail_url(format!("{}/film/x/", server.uri()))
        .with_source(SourceHint::new("http://h/a.m3u8", Some("720p".to_string())))
        .with_source(SourceHint::new("http://h/a.mp4", Some("1080p".to_string())));

    let streams = chain_resolver(&server).try_resolve(&entry).await.unwrap();

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].url, "http://h/a.m3u8");
    assert_eq!(streams[0].quality.as_deref(), Some("720p"));
}

#[tokio::test]
async fn test_multi_hop_chain_resolves_stream() {
    let server = MockServer::start().await;
    mount_film(&server, "the-film", "abc123", "https://cdn.example/hls/master.m3u8").await;

    let entry = CatalogEntry::new("the-film")
        .with_detail_url(format!("{}/film/the-film/", server.uri()));

    let streams = chain_resolver(&server).try_resolve(&entry).await.unwrap();

    assert_eq!(streams.len(), 1);
    let stream = &streams[0];
    assert_eq!(stream.url, "https://cdn.example/hls/master.m3u8");
    assert_eq!(stream.entry.title.as_deref(), Some("Detail Title"));
    assert_eq!(
        stream.headers.referer.as_deref(),
        Some(format!("{}/embed/abc123", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_missing_video_id_abandons_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/film/broken/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Nothing here</body></html>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/video/abc123/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let entry =
        CatalogEntry::new("broken").with_detail_url(format!("{}/film/broken/", server.uri()));

    let error = chain_resolver(&server).try_resolve(&entry).await.unwrap_err();
    assert_eq!(error.step(), Step::Detail);
    assert!(matches!(error, ResolveError::Parse { .. }));
}

#[tokio::test]
async fn test_player_failure_reports_final_step() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/film/gone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("zzz")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/video/zzz/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<iframe data-src="{}/embed/zzz"></iframe>"#,
            server.uri()
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/embed/zzz"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let entry = CatalogEntry::new("gone").with_detail_url(format!("{}/film/gone/", server.uri()));

    let error = chain_resolver(&server).try_resolve(&entry).await.unwrap_err();
    assert_eq!(error.step(), Step::Final);
    assert!(matches!(error, ResolveError::Fetch { .. }));
}

#[tokio::test]
async fn test_season_listing_resolves_episodes() {
    let server = MockServer::start().await;

    let listing = r#"[
        {"title": "Season 1", "episodes": [
            {"title": "Episode 1", "sources": [{"url": "https://cdn.example/s1e1.m3u8", "quality": "720p"}]},
            {"title": "Episode 2", "sources": [{"url": "https://cdn.example/s1e2.mp4"}]}
        ]}
    ]"#;
    Mock::given(method("GET"))
        .and(path("/api/season/by/serie/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .expect(1)
        .mount(&server)
        .await;

    let seasons = SeasonListing::new(format!("{}/api/season/by/serie/{{id}}/", server.uri()));
    let resolver =
        LinkResolver::new(test_fetcher(), CandidateFilter::default()).with_seasons(seasons);

    let entry = CatalogEntry::new("42").with_title("Serie");
    let streams = resolver.try_resolve(&entry).await.unwrap();

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].url, "https://cdn.example/s1e1.m3u8");
    assert_eq!(streams[0].episode.as_deref(), Some("Season 1 - Episode 1"));
}

fn season_resolver(server: &MockServer) -> LinkResolver {
    let seasons = SeasonListing::new(format!("{}/api/season/by/serie/{{id}}/", server.uri()));
    LinkResolver::new(test_fetcher(), CandidateFilter::default()).with_seasons(seasons)
}

#[tokio::test]
async fn test_series_sources_and_seasons_are_combined() {
    let server = MockServer::start().await;

    let listing = r#"[
        {"title": "Season 1", "episodes": [
            {"title": "Episode 1", "sources": [{"url": "https://cdn.example/s1e1.m3u8"}]}
        ]}
    ]"#;
    Mock::given(method("GET"))
        .and(path("/api/season/by/serie/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .expect(2)
        .mount(&server)
        .await;

    // Only a trailer is listed; the episodes still come through
    let trailer_only = CatalogEntry::new("42")
        .with_title("Serie")
        .with_source(SourceHint::new("https://cdn.example/trailer.mp4", None));
    let streams = season_resolver(&server)
        .try_resolve(&trailer_only)
        .await
        .unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].url, "https://cdn.example/s1e1.m3u8");

    // Listed streams come first, episodes after them
    let with_stream = CatalogEntry::new("42")
        .with_title("Serie")
        .with_source(SourceHint::new("https://cdn.example/intro.m3u8", None));
    let streams = season_resolver(&server)
        .try_resolve(&with_stream)
        .await
        .unwrap();
    let urls: Vec<&str> = streams.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.example/intro.m3u8",
            "https://cdn.example/s1e1.m3u8"
        ]
    );
    assert_eq!(streams[0].episode, None);
    assert_eq!(streams[1].episode.as_deref(), Some("Season 1 - Episode 1"));
}

#[tokio::test]
async fn test_season_failure_keeps_listed_streams() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/season/by/serie/42/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let with_stream = CatalogEntry::new("42")
        .with_source(SourceHint::new("https://cdn.example/intro.m3u8", None));
    let streams = season_resolver(&server)
        .try_resolve(&with_stream)
        .await
        .unwrap();
    assert_eq!(streams.len(), 1);

    let trailer_only = CatalogEntry::new("42")
        .with_source(SourceHint::new("https://cdn.example/trailer.mp4", None));
    let error = season_resolver(&server)
        .try_resolve(&trailer_only)
        .await
        .unwrap_err();
    assert_eq!(error.step(), Step::Seasons);
}
