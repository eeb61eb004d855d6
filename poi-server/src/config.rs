//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `POI_FEED_BASE_URL` | required |
//! | `POI_FEED_TIMEOUT_SECS` | 30 |
//! | `POI_LISTEN_ADDR` | `127.0.0.1:3000` |
//! | `POI_REFRESH_SECS` | unset (no periodic reload) |
//! | `POI_TIMETABLE_TTL_SECS` | 300 |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::feed::FeedConfig;
use crate::timetable::CacheConfig;

pub const FEED_BASE_URL: &str = "POI_FEED_BASE_URL";
pub const FEED_TIMEOUT_SECS: &str = "POI_FEED_TIMEOUT_SECS";
pub const LISTEN_ADDR: &str = "POI_LISTEN_ADDR";
pub const REFRESH_SECS: &str = "POI_REFRESH_SECS";
pub const TIMETABLE_TTL_SECS: &str = "POI_TIMETABLE_TTL_SECS";

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub cache: CacheConfig,
    pub listen_addr: SocketAddr,
    /// Interval between background reloads, if any.
    pub refresh: Option<Duration>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let feed = feed_config(&lookup)?;

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_var::<u64>(&lookup, TIMETABLE_TTL_SECS)? {
            cache.ttl = Duration::from_secs(secs);
        }

        let listen_addr = match parse_var::<SocketAddr>(&lookup, LISTEN_ADDR)? {
            Some(addr) => addr,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: LISTEN_ADDR,
                    value: DEFAULT_LISTEN_ADDR.to_string(),
                })?,
        };

        let refresh = parse_var::<u64>(&lookup, REFRESH_SECS)?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            feed,
            cache,
            listen_addr,
            refresh,
        })
    }
}

fn feed_config(lookup: &impl Fn(&str) -> Option<String>) -> Result<FeedConfig, ConfigError> {
    let base_url = lookup(FEED_BASE_URL)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(FEED_BASE_URL))?;

    let mut config = FeedConfig::new(base_url);
    if let Some(secs) = parse_var::<u64>(lookup, FEED_TIMEOUT_SECS)? {
        config = config.with_timeout(secs);
    }
    Ok(config)
}

/// Parse an optional variable. Unset and blank are both `None`.
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse().map(Some).map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::from_lookup(lookup(&[(FEED_BASE_URL, "http://localhost:8000")])).unwrap();

        assert_eq!(config.feed.base_url, "http://localhost:8000");
        assert_eq!(config.feed.timeout_secs, 30);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.listen_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.refresh, None);
    }

    #[test]
    fn overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (FEED_BASE_URL, " http://feeds.example/api "),
            (FEED_TIMEOUT_SECS, "5"),
            (LISTEN_ADDR, "0.0.0.0:8080"),
            (REFRESH_SECS, "600"),
            (TIMETABLE_TTL_SECS, "60"),
        ]))
        .unwrap();

        assert_eq!(config.feed.base_url, "http://feeds.example/api");
        assert_eq!(config.feed.timeout_secs, 5);
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.refresh, Some(Duration::from_secs(600)));
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn base_url_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(FEED_BASE_URL));

        let err = AppConfig::from_lookup(lookup(&[(FEED_BASE_URL, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(FEED_BASE_URL));
    }

    #[test]
    fn invalid_values_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            (FEED_BASE_URL, "http://x"),
            (FEED_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: FEED_TIMEOUT_SECS,
                value: "soon".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup(&[(FEED_BASE_URL, "http://x"), (LISTEN_ADDR, "localhost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: LISTEN_ADDR, .. }));
    }

    #[test]
    fn zero_refresh_disables() {
        let config =
            AppConfig::from_lookup(lookup(&[(FEED_BASE_URL, "http://x"), (REFRESH_SECS, "0")])).unwrap();
        assert_eq!(config.refresh, None);
    }
}
