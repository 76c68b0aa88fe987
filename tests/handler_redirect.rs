mod common;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::{TestApp, TestOptions};
use linkpulse::domain::repositories::ClickRepository;
use linkpulse::infrastructure::geoip::GeoLocator;
use serde_json::{Value, json};
use std::net::IpAddr;
use std::sync::Arc;

#[tokio::test]
async fn test_redirect_success() {
    let app = TestApp::new();
    app.insert_link("redirect1", "https://example.com/target", None)
        .await;

    let response = app.server.get("/redirect1").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_api_mount() {
    let app = TestApp::new();
    app.insert_link("viaapi", "https://example.com/api", None)
        .await;

    let response = app.server.get("/api/viaapi").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/api");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = TestApp::new();

    let response = app.server.get("/nonexistent").await;

    response.assert_status_not_found();
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "URL not found");
}

#[tokio::test]
async fn test_redirect_expired() {
    let mut app = TestApp::new();
    app.insert_link(
        "expired1",
        "https://example.com",
        Some(Utc::now() - Duration::hours(1)),
    )
    .await;

    let response = app.server.get("/expired1").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["message"], "URL expired");
    assert_eq!(app.drain_clicks().await, 0);
}

#[tokio::test]
async fn test_redirect_records_click() {
    let mut app = TestApp::new();
    let link = app
        .insert_link("counted", "https://example.com", None)
        .await;

    for _ in 0..3 {
        assert_eq!(app.server.get("/counted").await.status_code(), 302);
    }

    assert_eq!(app.drain_clicks().await, 3);

    let clicks = app.store.recent(link.id, 10).await.unwrap();
    assert_eq!(clicks.len(), 3);
    assert!(
        clicks
            .iter()
            .all(|c| c.ip_address.as_deref() == Some("127.0.0.1") && c.country == "Unknown")
    );

    let analytics = app.server.get("/api/analytics/counted").await;
    assert_eq!(analytics.json::<Value>()["data"]["click_count"], 3);
}

#[tokio::test]
async fn test_redirect_uses_forwarded_address() {
    let mut app = TestApp::new();
    let link = app
        .insert_link("proxied", "https://example.com", None)
        .await;

    app.server
        .get("/proxied")
        .add_header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .await;
    app.drain_clicks().await;

    let clicks = app.store.recent(link.id, 10).await.unwrap();
    assert_eq!(clicks[0].ip_address.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_redirect_ignores_forwarded_address_without_proxy() {
    let mut app = TestApp::with_options(TestOptions {
        behind_proxy: false,
        ..TestOptions::default()
    });
    let link = app.insert_link("direct", "https://example.com", None).await;

    app.server
        .get("/direct")
        .add_header("x-forwarded-for", "203.0.113.7")
        .await;
    app.drain_clicks().await;

    let clicks = app.store.recent(link.id, 10).await.unwrap();
    assert_eq!(clicks[0].ip_address.as_deref(), Some("127.0.0.1"));
}

struct FixedCountry;

#[async_trait]
impl GeoLocator for FixedCountry {
    async fn lookup_country(&self, _ip: IpAddr) -> Option<String> {
        Some("DE".to_string())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[tokio::test]
async fn test_redirect_click_is_geolocated() {
    let mut app = TestApp::with_locator(TestOptions::default(), Arc::new(FixedCountry));
    app.insert_link("geo", "https://example.com", None).await;

    app.server
        .get("/geo")
        .add_header("x-forwarded-for", "8.8.8.8")
        .await;
    app.server
        .get("/geo")
        .add_header("x-forwarded-for", "192.168.0.10")
        .await;
    app.drain_clicks().await;

    let body = app.server.get("/api/analytics/geo").await.json::<Value>();
    assert_eq!(body["data"]["geography"], json!({ "DE": 1, "Unknown": 1 }));
}

#[tokio::test]
async fn test_redirect_survives_full_queue() {
    let mut app = TestApp::with_options(TestOptions {
        queue_capacity: 1,
        ..TestOptions::default()
    });
    app.insert_link("busy", "https://example.com", None).await;

    for _ in 0..5 {
        let response = app.server.get("/busy").await;
        assert_eq!(response.status_code(), 302);
        assert_eq!(response.header("location"), "https://example.com");
    }

    assert_eq!(app.drain_clicks().await, 1);
}

#[tokio::test]
async fn test_redirect_survives_closed_queue() {
    let app = TestApp::new();
    app.insert_link("closed", "https://example.com/closed", None)
        .await;

    let TestApp {
        server, clicks_rx, ..
    } = app;
    drop(clicks_rx);

    let response = server.get("/closed").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/closed");
}

#[tokio::test]
async fn test_redirect_encodes_control_characters_in_target() {
    let mut app = TestApp::new();

    let created = app
        .server
        .post("/api/shorten")
        .json(&json!({ "original_url": "https://example.com/a\nb c", "alias": "ctl" }))
        .await;
    created.assert_status_ok();

    let response = app.server.get("/ctl").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/a%0Ab%20c");
    assert_eq!(app.drain_clicks().await, 1);

    let body = app.server.get("/api/analytics/ctl").await.json::<Value>();
    assert_eq!(body["data"]["click_count"], 1);
    assert_eq!(body["data"]["original_url"], "https://example.com/a\nb c");
}

#[tokio::test]
async fn test_worker_records_every_redirect() {
    let mut app = TestApp::new();
    let link = app.insert_link("many", "https://example.com", None).await;

    for _ in 0..25 {
        assert_eq!(app.server.get("/many").await.status_code(), 302);
    }

    assert_eq!(app.drain_clicks().await, 25);

    let clicks = app.store.recent(link.id, 100).await.unwrap();
    assert_eq!(clicks.len(), 25);

    let body = app.server.get("/api/analytics/many").await.json::<Value>();
    assert_eq!(body["data"]["click_count"], 25);
    assert_eq!(body["data"]["geography"], json!({ "Unknown": 25 }));
}
