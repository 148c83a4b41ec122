//! Integration tests for the server-rendered screens

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use botdash_core::Config;
use botdash_web::build_app;
use common::*;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn app(server: &MockServer) -> Router {
    init_test_logging();
    build_app(test_config(server)).unwrap()
}

fn app_with(server: &MockServer, configure: impl FnOnce(&mut Config)) -> Router {
    init_test_logging();
    let mut config = test_config(server);
    configure(&mut config);
    build_app(config).unwrap()
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_dashboard_renders_every_section() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/dashboard/today-summary", summary()).await;
    mount_json(&server, "/api/dashboard/stats", stats("today", 64)).await;
    mount_json(&server, "/api/analytics/popular-questions", questions()).await;
    mount_json(&server, "/api/alerts/unanswered", alerts(30, &[45])).await;
    let app = app(&server);

    let (status, html) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<a href="/" class="active" aria-current="page">Dashboard</a>"#));
    assert!(html.contains("Inquiries today"));
    assert!(html.contains("240"));
    assert!(html.contains("42s"));
    assert!(html.contains("64"));
    assert!(html.contains("How do I activate eSIM?"));
    assert!(html.contains("45 min"));
    assert!(html.contains(r#"href="/alerts?minutes=30""#));
    assert!(!html.contains("Something went wrong"));
}

#[tokio::test]
async fn test_dashboard_period_rekeys_statistics() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/dashboard/today-summary", summary()).await;
    mount_json(&server, "/api/analytics/popular-questions", questions()).await;
    mount_json(&server, "/api/alerts/unanswered", alerts(30, &[])).await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats("week", 777)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let (_, html) = get(&app, "/?period=week").await;

    assert!(html.contains("777"));
    assert!(html.contains(r#"<a href="/?period=week" class="active" aria-current="true">"#));
    assert!(html.contains("No unanswered inquiries"));
}

#[tokio::test]
async fn test_leads_page_past_the_end_shows_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("offset", "160"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leads_page(0, 0, 45, 160)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leads_page(41, 5, 45, 40)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let (status, html) = get(&app, "/leads?page=9").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("3 / 3"));
    assert!(html.contains("Total 45"));
    assert!(html.contains("kakao_41"));
    assert!(html.contains(r#"aria-disabled="true">Next"#));
}

#[tokio::test]
async fn test_leads_page_past_a_cached_count_is_clamped_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leads_page(1, 20, 45, 0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leads_page(41, 5, 45, 40)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("offset", "160"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leads_page(0, 0, 45, 160)))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server);

    let (_, first) = get(&app, "/leads").await;
    assert!(first.contains("1 / 3"));

    let (_, html) = get(&app, "/leads?page=9").await;

    assert!(html.contains("3 / 3"));
    assert!(html.contains("kakao_41"));
    assert_eq!(requests_to(&server, "/api/leads").await, 2);
}

#[tokio::test]
async fn test_selected_lead_shows_transcript() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/leads", leads_page(40, 3, 3, 0)).await;
    mount_json(&server, "/api/leads/42", lead_detail(42)).await;
    let app = app(&server);

    let (_, html) = get(&app, "/leads?selected=42&sort=created_at").await;

    assert!(html.contains("Yes, number porting is free."));
    assert_eq!(html.matches("lead-row selected").count(), 1);
    assert!(html.contains(r#"class="close" href="/leads?page=1&amp;sort=created_at""#));
}

#[tokio::test]
async fn test_leads_without_selection_never_fetch_detail() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/leads", leads_page(1, 2, 2, 0)).await;
    let app = app(&server);

    let (_, html) = get(&app, "/leads").await;

    assert!(html.contains("Select a lead to view the conversation"));
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|request| request.url.path() == "/api/leads"));
}

#[tokio::test]
async fn test_failed_section_offers_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/unanswered"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({ "error": "db down" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_json(&server, "/api/alerts/unanswered", alerts(15, &[20])).await;
    let app = app(&server);

    let (_, failed) = get(&app, "/alerts").await;
    assert!(failed.contains("Something went wrong"));
    assert!(failed.contains("db down"));
    assert!(failed.contains(r#"href="/alerts?minutes=15&amp;retry=1""#));

    let (_, cached) = get(&app, "/alerts?minutes=15").await;
    assert!(cached.contains("Something went wrong"));

    let (_, retried) = get(&app, "/alerts?minutes=15&retry=1").await;
    assert!(!retried.contains("Something went wrong"));
    assert!(retried.contains("20 min"));
}

#[tokio::test]
async fn test_alerts_past_their_interval_refetch_on_next_visit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/unanswered"))
        .and(query_param("minutes", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts(15, &[20])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/unanswered"))
        .and(query_param("minutes", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts(15, &[21, 35])))
        .mount(&server)
        .await;
    let app = app_with(&server, |config| config.refresh.alerts_interval_secs = 1);

    let (_, first) = get(&app, "/alerts?minutes=15").await;
    let (_, cached) = get(&app, "/alerts?minutes=15").await;
    assert!(first.contains("20 min"));
    assert!(cached.contains("20 min"));
    assert_eq!(requests_to(&server, "/api/alerts/unanswered").await, 1);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, refreshed) = get(&app, "/alerts?minutes=15").await;

    assert!(refreshed.contains("35 min"));
    assert!(!refreshed.contains("20 min"));
    assert_eq!(requests_to(&server, "/api/alerts/unanswered").await, 2);
}

#[tokio::test]
async fn test_summary_refreshes_without_keep_warm() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/dashboard/today-summary", summary()).await;
    mount_json(&server, "/api/dashboard/stats", stats("today", 64)).await;
    mount_json(&server, "/api/analytics/popular-questions", questions()).await;
    mount_json(&server, "/api/alerts/unanswered", alerts(30, &[])).await;
    let app = app_with(&server, |config| {
        config.refresh.summary_interval_secs = 1;
        config.refresh.alerts_interval_secs = 3600;
    });

    get(&app, "/").await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    get(&app, "/").await;

    assert_eq!(requests_to(&server, "/api/dashboard/today-summary").await, 2);
    assert_eq!(requests_to(&server, "/api/dashboard/stats").await, 1);
    assert_eq!(requests_to(&server, "/api/alerts/unanswered").await, 1);
}

#[tokio::test]
async fn test_alerts_threshold_and_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/unanswered"))
        .and(query_param("minutes", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts(60, &[90, 61])))
        .mount(&server)
        .await;
    mount_json(&server, "/api/leads/100", lead_detail(100)).await;
    let app = app(&server);

    let (_, html) = get(&app, "/alerts?minutes=60&selected=100").await;

    assert!(html.contains(r#"href="/alerts?minutes=60" class="active""#));
    assert!(html.contains("90 min"));
    assert!(html.contains("61 min"));
    assert!(html.contains("Can I keep my number?"));
    assert!(html.contains(r#"<p class="stat-value warning">2</p>"#));
}

#[tokio::test]
async fn test_analytics_uses_one_period_for_every_chart() {
    let server = MockServer::start().await;
    for (route, body) in [
        ("/api/analytics/time-distribution", distribution("month")),
        ("/api/analytics/popular-carriers", carriers("month")),
        ("/api/analytics/popular-models", models("month")),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("period", "month"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/analytics/popular-questions"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(questions()))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let (_, html) = get(&app, "/analytics?period=month").await;

    assert!(html.contains(r#"aria-current="page">Analytics</a>"#));
    assert!(html.contains(r#"title="20:00 - 11 inquiries""#));
    assert!(html.contains("SK Telecom"));
    assert!(html.contains("Galaxy S24 Ultr..."));
    assert!(html.contains("What plans are available?"));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let app = app(&server);

    let (status, body) = get(&app, "/health").await;
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["keep_warm"], false);
    assert_eq!(health["cache_entries"], 0);
}
