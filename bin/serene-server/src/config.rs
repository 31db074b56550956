//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the upstream provider credential.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Errors that prevent the server from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The upstream credential is absent or blank.  Every relay call would
    /// fail, so the server refuses to start instead.
    #[error("GOOGLE_API_KEY is not set; refusing to start without an upstream credential")]
    MissingApiKey,
}

/// Runtime configuration for serene-server.
///
/// Everything except the upstream credential has a default.
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// Credential for the generative-language provider.  Never logged.
    pub api_key: String,

    /// Model name passed to the provider (default: `"gemini-1.5-flash"`).
    pub model: String,

    /// Provider base URL, without the `/v1beta/...` path.
    pub upstream_url: String,

    /// Whole-request timeout for one upstream call.
    pub upstream_timeout: Duration,

    /// Comma-separated list of allowed CORS origins.  `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("upstream_url", &self.upstream_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl Config {
    /// Build [`Config`] from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            bind_address: env_or(&lookup, "SERENE_BIND", "0.0.0.0:5000"),
            api_key,
            model: env_or(&lookup, "SERENE_MODEL", "gemini-1.5-flash"),
            upstream_url: env_or(
                &lookup,
                "SERENE_UPSTREAM_URL",
                "https://generativelanguage.googleapis.com",
            ),
            upstream_timeout: Duration::from_secs(parse_env(
                &lookup,
                "SERENE_UPSTREAM_TIMEOUT_SECS",
                30,
            )),
            cors_allowed_origins: lookup("SERENE_CORS_ORIGINS").filter(|v| !v.trim().is_empty()),
            log_level: env_or(&lookup, "SERENE_LOG", "info"),
            log_json: lookup("SERENE_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_owned())
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
