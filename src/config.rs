use std::{env, time::Duration};

use url::Url;

use crate::status::{EXPIRY_WINDOW_DAYS, LOW_STOCK_THRESHOLD, StatusPolicy};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub timeout: Duration,
    pub status_policy: StatusPolicy,
    pub api_token: Option<String>,
}

impl AppConfig {
    pub fn new(api_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            api_url: Url::parse(api_url)?,
            timeout: Duration::from_secs(30),
            status_policy: StatusPolicy::default(),
            api_token: None,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let low_stock_threshold = env::var("LOW_STOCK_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(LOW_STOCK_THRESHOLD);
        let expiry_window_days = env::var("EXPIRY_WINDOW_DAYS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(EXPIRY_WINDOW_DAYS);
        let api_token = env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty());

        Ok(Self {
            api_url: Url::parse(&api_url)?,
            timeout: Duration::from_secs(timeout),
            status_policy: StatusPolicy {
                low_stock_threshold,
                expiry_window_days,
            },
            api_token,
        })
    }
}
