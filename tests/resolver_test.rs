use std::time::Duration;

use cwv_crawler::resolver::{HttpResolver, Resolver, DEFAULT_PREFIXES};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 把服务器地址当作前缀，域名当作路径
fn resolver_for(prefixes: Vec<String>) -> HttpResolver {
    HttpResolver::new(Duration::from_secs(5), 5)
        .unwrap()
        .with_prefixes(prefixes)
}

#[tokio::test]
async fn returns_final_url_after_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resolver = resolver_for(vec![format!("{}/", server.uri())]);

    assert_eq!(
        resolver.resolve("old").await,
        Some(format!("{}/new", server.uri()))
    );
}

#[tokio::test]
async fn falls_back_to_next_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // 明文服务器上 https 握手失败，退回 http
    let address = server.address();
    let resolver = resolver_for(vec![
        format!("https://{}/", address),
        format!("http://{}/", address),
    ]);

    assert_eq!(
        resolver.resolve("site").await,
        Some(format!("http://{}/site", address))
    );
}

#[tokio::test]
async fn every_prefix_failing_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = resolver_for(vec![
        format!("{}/", server.uri()),
        format!("{}/missing/", server.uri()),
    ]);

    assert_eq!(resolver.resolve("broken").await, None);
}

#[tokio::test]
async fn redirect_without_location_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let resolver = resolver_for(vec![format!("{}/", server.uri())]);

    assert_eq!(
        resolver.resolve("moved").await,
        Some(format!("{}/moved", server.uri()))
    );
}

#[test]
fn default_prefix_order() {
    assert_eq!(
        DEFAULT_PREFIXES,
        ["https://www.", "https://", "http://www.", "http://"]
    );
}
