use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings, read from the environment (and `.env` if present)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CMS root, e.g. `https://cms.example.com`; `None` means sample data only
    pub base_url: Option<String>,
    pub per_page: u32,
    pub max_pages: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            per_page: 20,
            max_pages: 10,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl Config {
    /// Load `.env`, then read settings from the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout_secs: u64 = parse_or(get("CMS_TIMEOUT_SECS"), "CMS_TIMEOUT_SECS", defaults.timeout.as_secs())?;
        let retry_delay_ms: u64 = parse_or(
            get("CMS_RETRY_DELAY_MS"),
            "CMS_RETRY_DELAY_MS",
            defaults.retry.base_delay.as_millis() as u64,
        )?;

        Ok(Self {
            base_url: get("CMS_BASE_URL"),
            per_page: parse_or(get("CMS_PER_PAGE"), "CMS_PER_PAGE", defaults.per_page)?,
            max_pages: parse_or(get("CMS_MAX_PAGES"), "CMS_MAX_PAGES", defaults.max_pages)?,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy::new(
                parse_or(get("CMS_MAX_RETRIES"), "CMS_MAX_RETRIES", defaults.retry.max_retries)?,
                Duration::from_millis(retry_delay_ms),
            ),
            // Untrimmed so a trailing separator ("UF ") survives
            currency_symbol: lookup("CURRENCY_SYMBOL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.currency_symbol),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
