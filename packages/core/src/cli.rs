use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::ClientConfig;

/// request-kit CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "request-kit",
    version,
    about = "Call an envelope-wrapped JSON API and print the unwrapped data"
)]
pub struct Cli {
    /// HTTP verb
    #[arg(value_enum)]
    pub method: HttpVerb,

    /// Endpoint path appended to the base URL, e.g. /users/1
    pub endpoint: String,

    /// JSON request body (post, put and patch only)
    #[arg(long)]
    pub data: Option<String>,

    /// API base URL (overrides API_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request deadline in milliseconds (overrides API_TIMEOUT_MS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Log every request, response and error
    #[arg(long)]
    pub dev: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Cli {
    /// Layer the flags over a config loaded from the environment.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(millis) = self.timeout_ms {
            config.timeout = Some(Duration::from_millis(millis));
        }
        if self.dev {
            config.dev_mode = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verb_endpoint_and_body() {
        let cli = Cli::try_parse_from([
            "request-kit",
            "post",
            "/users",
            "--data",
            r#"{"name":"B"}"#,
        ])
        .unwrap();

        assert_eq!(cli.method, HttpVerb::Post);
        assert_eq!(cli.endpoint, "/users");
        assert_eq!(cli.data.as_deref(), Some(r#"{"name":"B"}"#));
    }

    #[test]
    fn flags_override_environment_config() {
        let cli = Cli::try_parse_from([
            "request-kit",
            "get",
            "/health",
            "--base-url",
            "http://api.local",
            "--timeout-ms",
            "250",
            "--dev",
        ])
        .unwrap();

        let config = cli.apply(ClientConfig::new("http://ignored"));

        assert_eq!(config.base_url, "http://api.local");
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert!(config.dev_mode);
    }

    #[test]
    fn rejects_zero_timeout_like_the_environment_does() {
        let result = Cli::try_parse_from(["request-kit", "get", "/", "--timeout-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_verb() {
        assert!(Cli::try_parse_from(["request-kit", "head", "/"]).is_err());
    }
}
