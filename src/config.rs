use std::env;
use std::time::Duration;

use crate::api::session::token_from_cookie;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_NOTIFICATION_MS: u64 = 5000;

/// Settings for the backend client and the page engine
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash
    pub api_base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    pub request_timeout: Duration,
    /// How long a toast stays up before auto-dismissing
    pub notification_duration: Duration,
    /// Number of toasts visible at once; 1 means a new toast replaces the old
    pub notification_capacity: usize,
    pub visitor_name: String,
    pub visitor_email: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            token: None,
            request_timeout: Duration::from_secs(30),
            notification_duration: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            notification_capacity: 1,
            visitor_name: "Visitor".to_string(),
            visitor_email: String::new(),
        }
    }
}

impl ClientConfig {
    /// Build a config from `OPENHOUSEPAL_*` environment variables.
    ///
    /// `OPENHOUSEPAL_TOKEN` wins over a token found in `OPENHOUSEPAL_COOKIE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("OPENHOUSEPAL_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        config.token = env::var("OPENHOUSEPAL_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                env::var("OPENHOUSEPAL_COOKIE")
                    .ok()
                    .and_then(|cookie| token_from_cookie(&cookie))
            });

        if let Some(secs) = env::var("OPENHOUSEPAL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(name) = env::var("OPENHOUSEPAL_VISITOR_NAME") {
            config.visitor_name = name;
        }
        if let Ok(email) = env::var("OPENHOUSEPAL_VISITOR_EMAIL") {
            config.visitor_email = email;
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
