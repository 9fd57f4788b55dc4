//! Runtime tuning loaded from environment variables

use std::env::VarError;
use std::time::Duration;

use crate::error::FinderError;
use crate::traits::DEFAULT_USER_AGENT;

#[derive(Debug, Clone)]
pub struct FinderConfig {
    pub http_timeout_secs: u64,
    pub max_redirects: usize,
    pub navigation_timeout_secs: u64,
    pub settle_delay_secs: u64,
    /// Product cards inspected per selector profile
    pub max_cards: usize,
    pub top_deals_limit: usize,
    pub batch_max_queries: usize,
    /// Pause between consecutive queries in a batch
    pub batch_delay_ms: u64,
    /// Below this many total records the report suggests broadening the search
    pub sparse_threshold: usize,
    pub user_agent: String,
    pub log_level: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 15,
            max_redirects: 5,
            navigation_timeout_secs: 45,
            settle_delay_secs: 5,
            max_cards: 15,
            top_deals_limit: 10,
            batch_max_queries: 5,
            batch_delay_ms: 1000,
            sparse_threshold: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl FinderConfig {
    /// Load configuration, reading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidEnvVar`] if a variable is set but unparsable.
    pub fn load() -> Result<Self, FinderError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Build configuration from an env-var lookup, so tests can supply a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FinderError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let defaults = Self::default();

        let or_default = |var: &str, default: &str| -> String {
            lookup(var).unwrap_or_else(|_| default.to_string())
        };

        let parse_u64 = |var: &str, default: u64| -> Result<u64, FinderError> {
            match lookup(var) {
                Ok(raw) => raw.trim().parse::<u64>().map_err(|e| FinderError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
                Err(_) => Ok(default),
            }
        };

        let parse_usize = |var: &str, default: usize| -> Result<usize, FinderError> {
            match lookup(var) {
                Ok(raw) => raw.trim().parse::<usize>().map_err(|e| FinderError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
                Err(_) => Ok(default),
            }
        };

        let batch_max_queries =
            parse_usize("FINDER_BATCH_MAX_QUERIES", defaults.batch_max_queries)?;
        if batch_max_queries == 0 {
            return Err(FinderError::InvalidEnvVar {
                var: "FINDER_BATCH_MAX_QUERIES".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            http_timeout_secs: parse_u64("FINDER_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            max_redirects: parse_usize("FINDER_MAX_REDIRECTS", defaults.max_redirects)?,
            navigation_timeout_secs: parse_u64(
                "FINDER_NAVIGATION_TIMEOUT_SECS",
                defaults.navigation_timeout_secs,
            )?,
            settle_delay_secs: parse_u64("FINDER_SETTLE_DELAY_SECS", defaults.settle_delay_secs)?,
            max_cards: parse_usize("FINDER_MAX_CARDS", defaults.max_cards)?,
            top_deals_limit: parse_usize("FINDER_TOP_DEALS", defaults.top_deals_limit)?,
            batch_max_queries,
            batch_delay_ms: parse_u64("FINDER_BATCH_DELAY_MS", defaults.batch_delay_ms)?,
            sparse_threshold: parse_usize("FINDER_SPARSE_THRESHOLD", defaults.sparse_threshold)?,
            user_agent: or_default("FINDER_USER_AGENT", &defaults.user_agent),
            log_level: or_default("FINDER_LOG_LEVEL", &defaults.log_level),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_defaults() {
        let map = HashMap::new();
        let cfg = FinderConfig::from_lookup(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.http_timeout_secs, 15);
        assert_eq!(cfg.max_redirects, 5);
        assert_eq!(cfg.navigation_timeout_secs, 45);
        assert_eq!(cfg.settle_delay_secs, 5);
        assert_eq!(cfg.max_cards, 15);
        assert_eq!(cfg.top_deals_limit, 10);
        assert_eq!(cfg.batch_max_queries, 5);
        assert_eq!(cfg.batch_delay(), Duration::from_secs(1));
        assert_eq!(cfg.sparse_threshold, 5);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn overrides_are_applied() {
        let mut map = HashMap::new();
        map.insert("FINDER_MAX_CARDS", "20");
        map.insert("FINDER_BATCH_DELAY_MS", "250");
        map.insert("FINDER_USER_AGENT", "finder-test/1.0");
        let cfg = FinderConfig::from_lookup(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_cards, 20);
        assert_eq!(cfg.batch_delay_ms, 250);
        assert_eq!(cfg.user_agent, "finder-test/1.0");
    }

    #[test]
    fn invalid_number_is_rejected() {
        let mut map = HashMap::new();
        map.insert("FINDER_HTTP_TIMEOUT_SECS", "soon");
        let result = FinderConfig::from_lookup(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(FinderError::InvalidEnvVar { ref var, .. }) if var == "FINDER_HTTP_TIMEOUT_SECS"
            ),
            "expected InvalidEnvVar(FINDER_HTTP_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut map = HashMap::new();
        map.insert("FINDER_BATCH_MAX_QUERIES", "0");
        let result = FinderConfig::from_lookup(lookup_from_map(&map));
        assert!(matches!(result, Err(FinderError::InvalidEnvVar { .. })));
    }
}
