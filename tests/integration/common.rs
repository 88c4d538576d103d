use stream_harvest::config::{parse_config, Config, HttpConfig, PayloadEncoding};
use stream_harvest::resolver::encode_payload;
use stream_harvest::source::Fetcher;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// HTTP settings tuned for tests (short timeouts, quick retries)
pub fn test_http() -> HttpConfig {
    HttpConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        retry_delay_ms: 10,
        ..HttpConfig::default()
    }
}

pub fn test_fetcher() -> Fetcher {
    Fetcher::from_config(&test_http()).expect("Failed to build HTTP client")
}

/// Parses a TOML configuration, panicking on invalid input
pub fn config_from(toml: &str) -> Config {
    parse_config(toml).expect("Test configuration should be valid")
}

/// Mounts a JSON catalog page at `/api/movies?page=N`
pub async fn mount_catalog_page(server: &MockServer, page: u32, body: &str) {
    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Page URL template for the catalog served by `mount_catalog_page`
pub fn catalog_template(server: &MockServer) -> String {
    format!("{}/api/movies?page={{page}}", server.uri())
}

/// A one-item JSON page whose single source is an HLS stream
pub fn single_item_page(id: &str) -> String {
    format!(
        r#"[{{"id":"{id}","title":"Movie {id}","sources":[{{"url":"http://cdn.example/{id}.m3u8"}}]}}]"#
    )
}

pub fn detail_page(video_id: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="section-title">Detail Title</h1>
            <div class="alternative-links">
                <button class="alternative-link" data-video="{video_id}">Source</button>
            </div>
        </body></html>"#
    )
}

/// Mounts detail, indirection and player pages for one film
pub async fn mount_film(server: &MockServer, slug: &str, video_id: &str, stream_url: &str) {
    let detail_url = format!("{}/film/{}/", server.uri(), slug);

    Mock::given(method("GET"))
        .and(path(format!("/film/{}/", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(video_id)))
        .mount(server)
        .await;

    let iframe_json = format!(
        r#"{{"html":"<iframe data-src=\"{}\/embed\/{}\"><\/iframe>"}}"#,
        server.uri().replace('/', "\\/"),
        video_id
    );
    Mock::given(method("GET"))
        .and(path(format!("/video/{}/", video_id)))
        .and(header("X-Requested-With", "fetch"))
        .and(header("Referer", detail_url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(iframe_json))
        .expect(1)
        .mount(server)
        .await;

    let player = format!(
        r#"<script>var player = new Playerjs({{file_link="{}"}});</script>"#,
        encode_payload(stream_url, PayloadEncoding::Base64)
    );
    let origin_referer = format!("{}/", server.uri());
    Mock::given(method("GET"))
        .and(path(format!("/embed/{}", video_id)))
        .and(header("Referer", origin_referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(player))
        .expect(1)
        .mount(server)
        .await;
}
