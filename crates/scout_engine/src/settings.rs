use std::time::Duration;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "SCOUT_API_URL";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL all three endpoints are resolved against.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Per-request cap; a hung status poll cannot stall the loop forever.
    pub request_timeout: Duration,
    /// Delay between consecutive status polls.
    pub poll_interval: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl ApiSettings {
    /// Defaults, with the base URL taken from `SCOUT_API_URL` when set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                settings.base_url = url.trim_end_matches('/').to_owned();
            }
        }
        settings
    }
}
