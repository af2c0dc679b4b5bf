use std::env;
use std::time::Duration;

/// Client configuration shared read-only by every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix concatenated in front of every endpoint. Empty means the
    /// endpoint is used as-is.
    pub base_url: String,
    /// Log every request, response and error.
    pub dev_mode: bool,
    /// Deadline applied when a request does not set its own.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL").unwrap_or_default();

        let environment = match lookup("APP_ENV").as_deref() {
            None | Some("production") => AppEnvironment::Production,
            Some("development") => AppEnvironment::Development,
            Some(other) => return Err(format!("Invalid APP_ENV: {}", other)),
        };

        let dev_mode = match lookup("API_DEV_MODE").as_deref() {
            None => environment == AppEnvironment::Development,
            Some("true") => true,
            Some("false") => false,
            Some(other) => return Err(format!("Invalid API_DEV_MODE: {}", other)),
        };

        let timeout = match lookup("API_TIMEOUT_MS") {
            None => None,
            Some(raw) => {
                let millis = raw
                    .parse::<u64>()
                    .map_err(|_| "API_TIMEOUT_MS must be a valid number")?;
                if millis == 0 {
                    return Err("API_TIMEOUT_MS must be greater than zero".to_string());
                }
                Some(Duration::from_millis(millis))
            }
        };

        Ok(Self {
            base_url,
            dev_mode,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_same_origin_production() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.base_url.is_empty());
        assert!(!config.dev_mode);
    }

    #[test]
    fn development_env_enables_dev_mode() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("API_BASE_URL", "http://localhost:8000/api"),
            ("APP_ENV", "development"),
            ("API_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert!(config.dev_mode);
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn explicit_flag_overrides_environment() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "development"),
            ("API_DEV_MODE", "false"),
        ]))
        .unwrap();
        assert!(!config.dev_mode);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("APP_ENV", "staging")])).is_err());
        let timeout_text = lookup_from(&[("API_TIMEOUT_MS", "soon")]);
        assert!(ClientConfig::from_lookup(timeout_text).is_err());
        let timeout_zero = lookup_from(&[("API_TIMEOUT_MS", "0")]);
        assert!(ClientConfig::from_lookup(timeout_zero).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("API_DEV_MODE", "yes")])).is_err());
    }
}
