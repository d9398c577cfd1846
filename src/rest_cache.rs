//! REST adapter for a travel cache table (PostgREST-style API).

use serde::Deserialize;

use crate::error::{CacheError, ConfigError};
use crate::traits::{CachedTravel, TravelCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestCacheConfig {
    pub base_url: String,
    /// Sent both as `apikey` and bearer token when set.
    pub api_key: Option<String>,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for RestCacheConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            table: "travel_cache".to_string(),
            timeout_secs: 5,
        }
    }
}

impl RestCacheConfig {
    /// Load configuration from the environment, reading `.env` if present.
    ///
    /// `TRAVEL_CACHE_URL` is required; `TRAVEL_CACHE_KEY`,
    /// `TRAVEL_CACHE_TABLE` and `TRAVEL_CACHE_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| var(name).filter(|value| !value.trim().is_empty());

        let base_url = non_empty("TRAVEL_CACHE_URL").ok_or(ConfigError::Missing("TRAVEL_CACHE_URL"))?;

        let timeout_secs = match non_empty("TRAVEL_CACHE_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "TRAVEL_CACHE_TIMEOUT_SECS",
                value,
            })?,
            None => defaults.timeout_secs,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: non_empty("TRAVEL_CACHE_KEY"),
            table: non_empty("TRAVEL_CACHE_TABLE").unwrap_or(defaults.table),
            timeout_secs,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[derive(Debug, Clone)]
pub struct RestTravelCache {
    config: RestCacheConfig,
    client: reqwest::blocking::Client,
}

impl RestTravelCache {
    pub fn new(config: RestCacheConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RestCacheConfig {
        &self.config
    }
}

impl TravelCache for RestTravelCache {
    fn lookup(&self, key: &str) -> Result<Option<CachedTravel>, CacheError> {
        let mut request = self
            .client
            .get(self.config.table_url())
            .query(&[("key", format!("eq.{key}")), ("select", "minutes,km".to_string())]);

        if let Some(api_key) = &self.config.api_key {
            request = request.header("apikey", api_key.as_str()).bearer_auth(api_key);
        }

        let rows = request
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<CacheRow>>())?;

        Ok(first_entry(rows))
    }
}

#[derive(Debug, Deserialize)]
struct CacheRow {
    minutes: Option<f64>,
    km: Option<f64>,
}

fn first_entry(rows: Vec<CacheRow>) -> Option<CachedTravel> {
    rows.into_iter().next().and_then(|row| {
        row.minutes.map(|minutes| CachedTravel {
            minutes,
            km: row.km,
        })
    })
}
