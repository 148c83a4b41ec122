//! Configuration management for the support bot dashboard

use crate::types::AlertThreshold;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote chatbot API configuration
    pub api: ApiConfig,

    /// Dashboard web server configuration
    pub server: ServerConfig,

    /// Background refresh intervals
    pub refresh: RefreshConfig,

    /// Screen defaults
    pub dashboard: DashboardConfig,

    /// Long-lived subscriptions kept by the server
    pub live: LiveConfig,

    /// Query cache housekeeping
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chatbot API (scheme, host and port)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Dashboard web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Automatic refresh intervals for the resources that poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Today summary refresh interval in seconds
    #[serde(default = "default_summary_interval")]
    pub summary_interval_secs: u64,

    /// Unanswered alerts refresh interval in seconds
    #[serde(default = "default_alerts_interval")]
    pub alerts_interval_secs: u64,
}

/// Defaults for the individual screens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Threshold preselected on the alerts screen
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold_minutes: u32,

    /// Threshold used by the alerts card on the main dashboard
    #[serde(default = "default_dashboard_alert_minutes")]
    pub dashboard_alert_minutes: u32,

    /// Leads per page on the leads screen
    #[serde(default = "default_leads_page_size")]
    pub leads_page_size: u32,

    /// Popular questions shown on the main dashboard
    #[serde(default = "default_dashboard_questions")]
    pub dashboard_questions_limit: u32,

    /// Popular questions shown on the analytics screen
    #[serde(default = "default_analytics_limit")]
    pub analytics_questions_limit: u32,

    /// Carrier and model rows requested for the analytics charts
    #[serde(default = "default_analytics_limit")]
    pub chart_limit: u32,
}

/// Subscriptions the server keeps open so their refresh keeps running
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Keep the summary and dashboard alerts queries warm
    #[serde(default = "default_keep_warm")]
    pub keep_warm: bool,
}

/// Query cache housekeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds an entry nobody subscribes to is kept before it is evicted
    #[serde(default = "default_retention")]
    pub retention_secs: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human readable output
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_user_agent() -> String {
    format!("botdash/{}", env!("CARGO_PKG_VERSION"))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_summary_interval() -> u64 {
    60
}

const fn default_alerts_interval() -> u64 {
    30
}

const fn default_alert_threshold() -> u32 {
    15
}

const fn default_dashboard_alert_minutes() -> u32 {
    30
}

const fn default_leads_page_size() -> u32 {
    20
}

const fn default_dashboard_questions() -> u32 {
    5
}

const fn default_analytics_limit() -> u32 {
    10
}

const fn default_keep_warm() -> bool {
    true
}

const fn default_retention() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            summary_interval_secs: default_summary_interval(),
            alerts_interval_secs: default_alerts_interval(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            alert_threshold_minutes: default_alert_threshold(),
            dashboard_alert_minutes: default_dashboard_alert_minutes(),
            leads_page_size: default_leads_page_size(),
            dashboard_questions_limit: default_dashboard_questions(),
            analytics_questions_limit: default_analytics_limit(),
            chart_limit: default_analytics_limit(),
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            keep_warm: default_keep_warm(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ApiConfig {
    /// Request timeout, if one is configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl RefreshConfig {
    /// Refresh interval for the today summary
    #[must_use]
    pub const fn summary_interval(&self) -> Duration {
        Duration::from_secs(self.summary_interval_secs)
    }

    /// Refresh interval for the unanswered alerts
    #[must_use]
    pub const fn alerts_interval(&self) -> Duration {
        Duration::from_secs(self.alerts_interval_secs)
    }
}

impl CacheConfig {
    /// How long an unsubscribed entry survives
    #[must_use]
    pub const fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

impl Config {
    /// Load configuration from an optional file and `BOTDASH__*` environment variables
    ///
    /// Without an explicit path a `botdash.{toml,yaml,json}` file in the working
    /// directory is used when present. Nested keys use a double underscore, for
    /// example `BOTDASH__API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// resulting configuration fails [`Config::validate`].
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("botdash").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("BOTDASH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> crate::Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(crate::Error::validation("api.base_url", "must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(crate::Error::validation(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(crate::Error::validation("api.timeout_secs", "must be at least 1"));
        }
        if self.refresh.summary_interval_secs == 0 {
            return Err(crate::Error::validation(
                "refresh.summary_interval_secs",
                "must be at least 1",
            ));
        }
        if self.refresh.alerts_interval_secs == 0 {
            return Err(crate::Error::validation(
                "refresh.alerts_interval_secs",
                "must be at least 1",
            ));
        }
        if self.cache.retention_secs == 0 {
            return Err(crate::Error::validation(
                "cache.retention_secs",
                "must be at least 1",
            ));
        }
        if AlertThreshold::from_minutes(self.dashboard.alert_threshold_minutes).is_none() {
            return Err(crate::Error::validation(
                "dashboard.alert_threshold_minutes",
                "must be one of 5, 15, 30 or 60",
            ));
        }
        if self.dashboard.dashboard_alert_minutes == 0 {
            return Err(crate::Error::validation(
                "dashboard.dashboard_alert_minutes",
                "must be at least 1",
            ));
        }
        for (field, value) in [
            ("dashboard.leads_page_size", self.dashboard.leads_page_size),
            (
                "dashboard.dashboard_questions_limit",
                self.dashboard.dashboard_questions_limit,
            ),
            (
                "dashboard.analytics_questions_limit",
                self.dashboard.analytics_questions_limit,
            ),
            ("dashboard.chart_limit", self.dashboard.chart_limit),
        ] {
            if value == 0 {
                return Err(crate::Error::validation(field, "must be at least 1"));
            }
        }
        Ok(())
    }
}
