//! Test helper functions and utilities

use botdash_core::{Config, config::RefreshConfig};
use botdash_web::{ApiClient, QueryCache, Resources};
use serde_json::Value;
use std::{sync::Once, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing at `server`, without warm subscriptions
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.live.keep_warm = false;
    config
}

/// Hooks over a fresh cache talking to `server`
pub fn resources(server: &MockServer) -> Resources {
    let client = ApiClient::new(&server.uri()).unwrap();
    Resources::new(client, QueryCache::new(), RefreshConfig::default())
}

/// Hooks over a fresh cache that evicts unused entries after `retention`
pub fn resources_with_retention(server: &MockServer, retention: Duration) -> Resources {
    let client = ApiClient::new(&server.uri()).unwrap();
    Resources::new(
        client,
        QueryCache::with_retention(retention),
        RefreshConfig::default(),
    )
}

/// Answer every `GET route` with `body`
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer every `GET route` with `status` and a JSON error body
pub async fn mount_error(server: &MockServer, route: &str, status: u16, message: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({ "error": message })),
        )
        .mount(server)
        .await;
}
