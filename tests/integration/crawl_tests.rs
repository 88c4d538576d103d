//! Catalog crawl tests against a mock catalog server

use crate::common::{catalog_template, mount_catalog_page, test_fetcher};
use stream_harvest::config::{ExtractorConfig, HttpConfig};
use stream_harvest::crawler::{CatalogCrawler, CrawlError, CrawlOptions};
use stream_harvest::extractor::{HtmlListingExtractor, JsonCatalogExtractor};
use stream_harvest::source::{Fetcher, HttpPageSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn two_item_page(page: u32) -> String {
    format!(
        r#"[{{"id":"{page}a","title":"A{page}"}},{{"id":"{page}b","title":"B{page}"}}]"#
    )
}

#[tokio::test]
async fn test_crawl_stops_at_first_empty_page() {
    let server = MockServer::start().await;

    for page in 0..3 {
        mount_catalog_page(&server, page, &two_item_page(page)).await;
    }
    mount_catalog_page(&server, 3, "[]").await;

    // Page 4 must never be requested
    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let source = HttpPageSource::new("movies", catalog_template(&server), test_fetcher());
    let extractor = JsonCatalogExtractor::new(None);
    let crawler = CatalogCrawler::new(&source, &extractor, CrawlOptions::default());

    let entries = crawler.collect_all().await.unwrap();

    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["0a", "0b", "1a", "1b", "2a", "2b"]);
}

#[tokio::test]
async fn test_crawl_respects_initial_page_and_limit() {
    let server = MockServer::start().await;

    mount_catalog_page(&server, 1, &two_item_page(1)).await;
    mount_catalog_page(&server, 2, &two_item_page(2)).await;

    let source = HttpPageSource::new("movies", catalog_template(&server), test_fetcher());
    let extractor = JsonCatalogExtractor::new(None);
    let options = CrawlOptions {
        initial_page: 1,
        max_pages: Some(2),
        page_size: None,
    };
    let mut crawler = CatalogCrawler::new(&source, &extractor, options);

    let mut count = 0;
    while crawler.next_entry().await.unwrap().is_some() {
        count += 1;
    }

    assert_eq!(count, 4);
    assert_eq!(crawler.pages_fetched(), 2);
    assert!(crawler.is_finished());
}

#[tokio::test]
async fn test_first_page_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = HttpPageSource::new("movies", catalog_template(&server), test_fetcher());
    let extractor = JsonCatalogExtractor::new(None);
    let mut crawler = CatalogCrawler::new(&source, &extractor, CrawlOptions::default());

    match crawler.next_entry().await {
        Err(CrawlError::FirstPage { page, source }) => {
            assert_eq!(page, 0);
            assert!(source.to_string().contains("404"));
        }
        other => panic!("expected first page failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_later_failure_ends_catalog() {
    let server = MockServer::start().await;

    mount_catalog_page(&server, 0, &two_item_page(0)).await;
    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = HttpPageSource::new("movies", catalog_template(&server), test_fetcher());
    let extractor = JsonCatalogExtractor::new(None);
    let crawler = CatalogCrawler::new(&source, &extractor, CrawlOptions::default());

    let entries = crawler.collect_all().await.unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let server = MockServer::start().await;

    // First request fails, the next one succeeds
    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_catalog_page(&server, 0, &two_item_page(0)).await;
    mount_catalog_page(&server, 1, "[]").await;

    let http = HttpConfig {
        max_retries: 2,
        retry_delay_ms: 10,
        ..HttpConfig::default()
    };
    let fetcher = Fetcher::from_config(&http).unwrap();
    let source = HttpPageSource::new("movies", catalog_template(&server), fetcher);
    let extractor = JsonCatalogExtractor::new(None);
    let crawler = CatalogCrawler::new(&source, &extractor, CrawlOptions::default());

    let entries = crawler.collect_all().await.unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_page_requests_carry_static_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .and(wiremock::matchers::header("Referer", "https://app.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpPageSource::new("movies", catalog_template(&server), test_fetcher())
        .with_header("Referer", "https://app.example/");
    let extractor = JsonCatalogExtractor::new(None);
    let crawler = CatalogCrawler::new(&source, &extractor, CrawlOptions::default());

    assert!(crawler.collect_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_html_listing_crawl() {
    let server = MockServer::start().await;
    let listing = r#"<html><body>
        <div class="movie-box"><a href="/film/first/"><img data-src="/p/1.jpg"></a><h2>First</h2></div>
        <div class="movie-box"><a href="/film/second/"><img src="/p/2.jpg"></a><h2>Second</h2></div>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/films/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/films/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let template = format!("{}/films/page/{{page}}/", server.uri());
    let source = HttpPageSource::new("films", template, test_fetcher());
    let extractor = HtmlListingExtractor::from_config(&ExtractorConfig {
        item_selector: Some("div.movie-box".to_string()),
        title_selector: Some("h2".to_string()),
        logo_selector: Some("img".to_string()),
        ..ExtractorConfig::default()
    })
    .unwrap();
    let options = CrawlOptions {
        initial_page: 1,
        ..CrawlOptions::default()
    };
    let crawler = CatalogCrawler::new(&source, &extractor, options);

    let entries = crawler.collect_all().await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title.as_deref(), Some("First"));
    assert_eq!(
        entries[0].detail_url.as_deref(),
        Some(format!("{}/film/first/", server.uri()).as_str())
    );
    assert_eq!(
        entries[0].logo.as_deref(),
        Some(format!("{}/p/1.jpg", server.uri()).as_str())
    );
    assert_eq!(entries[1].title.as_deref(), Some("Second"));
}
