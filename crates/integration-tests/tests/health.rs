mod harness;

use harness::config::ConfigBuilder;
use harness::mock_did::MockDid;
use harness::server::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn health_endpoint_reports_ready() {
    let mock = MockDid::start().await.unwrap();
    let config = ConfigBuilder::new().with_did(&mock.base_url()).build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok", "ready": true}));
}

#[tokio::test]
async fn health_endpoint_lists_missing_settings() {
    let mock = MockDid::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_did(&mock.base_url())
        .without_api_key()
        .without_image_url()
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 503);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ready"], false);
    assert_eq!(body["missing"], json!(["talk.api_key", "talk.image_url"]));
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let mock = MockDid::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_did(&mock.base_url())
        .without_health()
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn banner_lists_endpoints() {
    let config = ConfigBuilder::new().build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/")).send().await.unwrap();

    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["endpoints"], json!(["/health", "/say"]));
}

#[tokio::test]
async fn cors_preflight_allows_browser_clients() {
    let config = ConfigBuilder::new().build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .request(reqwest::Method::OPTIONS, server.url("/say"))
        .header("Origin", "https://alma.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}
