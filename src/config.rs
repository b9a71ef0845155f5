use crate::search::DEFAULT_RESULT_LIMIT;
use std::{env, fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "https://api.rentcast.io/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Without a key the mock listing source is used
    pub api_key: Option<String>,
    pub result_limit: u32,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("LISTINGS_API_KEY").filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("LISTINGS_API_KEY not set, listings will come from mock data");
        }

        Self {
            api_url: try_load(&lookup, "LISTINGS_API_URL", DEFAULT_API_URL.to_string()),
            api_key,
            result_limit: try_load(&lookup, "SEARCH_RESULT_LIMIT", DEFAULT_RESULT_LIMIT),
            http_timeout: Duration::from_secs(try_load(&lookup, "HTTP_TIMEOUT_SECS", 30)),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.result_limit, DEFAULT_RESULT_LIMIT);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = config_from(&[
            ("LISTINGS_API_KEY", "secret"),
            ("SEARCH_RESULT_LIMIT", "50"),
            ("HTTP_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.result_limit, 50);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = config_from(&[("LISTINGS_API_KEY", "  ")]);
        assert_eq!(config.api_key, None);
    }
}
