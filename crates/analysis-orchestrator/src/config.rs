use anyhow::{bail, Context, Result};
use market_data_client::{DEFAULT_SOURCES, DEFAULT_STOCK_LIST_URL};
use sector_signals::SectorClassification;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub stock_list_url: String,

    // Cache lifetimes
    pub stock_cache_ttl_secs: u64,     // 300 (5 minutes)
    pub news_cache_ttl_secs: u64,      // 900 (15 minutes)
    pub sentiment_cache_ttl_secs: u64, // 1800 (30 minutes)

    // Fetching
    pub news_rate_limit_per_min: usize, // 10 per source
    pub http_timeout_secs: u64,         // 60
    pub news_sources: Vec<String>,

    // Rotation groups
    pub defensive_sectors: Vec<String>,
    pub cyclical_sectors: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let classification = SectorClassification::default();
        Self {
            stock_list_url: DEFAULT_STOCK_LIST_URL.to_string(),
            stock_cache_ttl_secs: 300,
            news_cache_ttl_secs: 900,
            sentiment_cache_ttl_secs: 1800,
            news_rate_limit_per_min: 10,
            http_timeout_secs: 60,
            news_sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            defensive_sectors: classification.defensive_sectors,
            cyclical_sectors: classification.cyclical_sectors,
        }
    }
}

fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AnalyticsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let number = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number, got {:?}", key, raw)),
                None => Ok(default),
            }
        };
        let list = |key: &str, default: Vec<String>| lookup(key).map(|raw| comma_list(&raw)).unwrap_or(default);

        let config = Self {
            stock_list_url: lookup("STOCK_LIST_URL").unwrap_or(defaults.stock_list_url),
            stock_cache_ttl_secs: number("STOCK_CACHE_TTL_SECS", defaults.stock_cache_ttl_secs)?,
            news_cache_ttl_secs: number("NEWS_CACHE_TTL_SECS", defaults.news_cache_ttl_secs)?,
            sentiment_cache_ttl_secs: number(
                "SENTIMENT_CACHE_TTL_SECS",
                defaults.sentiment_cache_ttl_secs,
            )?,
            news_rate_limit_per_min: number(
                "NEWS_RATE_LIMIT_PER_MIN",
                defaults.news_rate_limit_per_min as u64,
            )? as usize,
            http_timeout_secs: number("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            news_sources: list("NEWS_SOURCES", defaults.news_sources),
            defensive_sectors: list("ROTATION_DEFENSIVE_SECTORS", defaults.defensive_sectors),
            cyclical_sectors: list("ROTATION_CYCLICAL_SECTORS", defaults.cyclical_sectors),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stock_cache_ttl_secs == 0 {
            bail!("STOCK_CACHE_TTL_SECS must be greater than zero");
        }
        if self.news_cache_ttl_secs == 0 {
            bail!("NEWS_CACHE_TTL_SECS must be greater than zero");
        }
        if self.sentiment_cache_ttl_secs == 0 {
            bail!("SENTIMENT_CACHE_TTL_SECS must be greater than zero");
        }
        if self.news_rate_limit_per_min == 0 {
            bail!("NEWS_RATE_LIMIT_PER_MIN must be greater than zero");
        }
        if self.http_timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn classification(&self) -> SectorClassification {
        SectorClassification::new(self.defensive_sectors.clone(), self.cyclical_sectors.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AnalyticsConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
        assert_eq!(config.news_sources.len(), 5);
        assert_eq!(config.news_cache_ttl_secs, 900);
    }

    #[test]
    fn test_overrides_and_lists() {
        let config = AnalyticsConfig::from_lookup(lookup(&[
            ("STOCK_CACHE_TTL_SECS", "120"),
            ("NEWS_SOURCES", "Reuters, MarketWatch,"),
            ("ROTATION_CYCLICAL_SECTORS", "Technology,Automobile"),
        ]))
        .unwrap();

        assert_eq!(config.stock_cache_ttl_secs, 120);
        assert_eq!(config.news_sources, vec!["Reuters", "MarketWatch"]);
        assert_eq!(
            config.classification().cyclical_sectors,
            vec!["Technology", "Automobile"]
        );
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = AnalyticsConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(AnalyticsConfig::from_lookup(lookup(&[("NEWS_CACHE_TTL_SECS", "0")])).is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let err = AnalyticsConfig::from_lookup(lookup(&[("NEWS_RATE_LIMIT_PER_MIN", "0")])).unwrap_err();
        assert!(err.to_string().contains("NEWS_RATE_LIMIT_PER_MIN"));

        let config = AnalyticsConfig::from_lookup(lookup(&[("NEWS_RATE_LIMIT_PER_MIN", "1")])).unwrap();
        assert_eq!(config.news_rate_limit_per_min, 1);
    }
}
