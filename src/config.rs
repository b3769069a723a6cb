//! Provider configuration.
//!
//! The provider block accepts `host`, `api_key`, `timeout_seconds` and
//! `insecure`. `host` and `api_key` fall back to the `DOKPLOY_HOST` and
//! `DOKPLOY_API_KEY` environment variables when they are not set in
//! configuration.

use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::Deserialize;
use url::Url;

use crate::schema::{Attribute, Diagnostic, Schema, Validator};

/// Environment variable consulted when `host` is not configured.
pub const HOST_ENV: &str = "DOKPLOY_HOST";

/// Environment variable consulted when `api_key` is not configured.
pub const API_KEY_ENV: &str = "DOKPLOY_API_KEY";

/// Request timeout used when `timeout_seconds` is not configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The raw provider block as sent by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// Dokploy instance URL.
    #[serde(default)]
    pub host: Option<String>,
    /// API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_seconds: Option<i64>,
    /// Skip TLS verification.
    #[serde(default)]
    pub insecure: Option<bool>,
}

/// Everything the HTTP client needs, after defaults and environment
/// fallbacks have been applied.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Dokploy instance, without the `/api` suffix.
    pub host: Url,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Schema of the provider block.
pub fn provider_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "host",
            Attribute::optional_string().with_description(format!(
                "URL of the Dokploy instance. Falls back to {}.",
                HOST_ENV
            )),
        )
        .with_attribute(
            "api_key",
            Attribute::optional_string()
                .sensitive()
                .with_description(format!("Dokploy API key. Falls back to {}.", API_KEY_ENV)),
        )
        .with_attribute(
            "timeout_seconds",
            Attribute::optional_int64()
                .with_validator(Validator::Between { min: 1, max: 600 })
                .with_description("Per-request timeout in seconds. Defaults to 30."),
        )
        .with_attribute(
            "insecure",
            Attribute::optional_bool()
                .with_description("Skip TLS certificate verification."),
        )
}

impl ProviderConfig {
    /// Resolve the configuration against the process environment.
    pub fn resolve(&self) -> Result<ClientConfig, Vec<Diagnostic>> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration with an explicit environment lookup.
    pub fn resolve_with<F>(&self, env: F) -> Result<ClientConfig, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut diagnostics = Vec::new();

        let host = non_empty(self.host.clone()).or_else(|| non_empty(env(HOST_ENV)));
        let api_key = non_empty(self.api_key.clone()).or_else(|| non_empty(env(API_KEY_ENV)));

        let host = match host {
            Some(raw) => match parse_host(&raw) {
                Ok(url) => Some(url),
                Err(detail) => {
                    diagnostics.push(
                        Diagnostic::error("Invalid Dokploy host")
                            .with_detail(detail)
                            .with_attribute("host"),
                    );
                    None
                }
            },
            None => {
                diagnostics.push(
                    Diagnostic::error("Missing Dokploy host")
                        .with_detail(format!(
                            "Set `host` in the provider block or the {} environment variable",
                            HOST_ENV
                        ))
                        .with_attribute("host"),
                );
                None
            }
        };

        match api_key.as_deref() {
            Some(key) if HeaderValue::from_str(key).is_err() => diagnostics.push(
                Diagnostic::error("Invalid Dokploy API key")
                    .with_detail(
                        "The API key contains characters that cannot be sent in an HTTP header",
                    )
                    .with_attribute("api_key"),
            ),
            Some(_) => {}
            None => diagnostics.push(
                Diagnostic::error("Missing Dokploy API key")
                    .with_detail(format!(
                        "Set `api_key` in the provider block or the {} environment variable",
                        API_KEY_ENV
                    ))
                    .with_attribute("api_key"),
            ),
        }

        let timeout = match self.timeout_seconds {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(secs) if (1..=600).contains(&secs) => Duration::from_secs(secs as u64),
            Some(secs) => {
                diagnostics.push(
                    Diagnostic::error("Invalid timeout")
                        .with_detail(format!(
                            "timeout_seconds must be between 1 and 600, got {}",
                            secs
                        ))
                        .with_attribute("timeout_seconds"),
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        };

        match (host, api_key) {
            (Some(host), Some(api_key)) if diagnostics.is_empty() => Ok(ClientConfig {
                host,
                api_key,
                timeout,
                insecure: self.insecure.unwrap_or(false),
            }),
            _ => Err(diagnostics),
        }
    }
}

/// Parse and normalise the host URL: scheme must be http(s), and a trailing
/// `/api` is dropped since requests add it themselves.
pub fn parse_host(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/api").unwrap_or(trimmed);

    let mut url = Url::parse(trimmed).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => {},
        other => return Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
    if url.host_str().is_none() {
        return Err(format!("'{}' has no host", raw));
    }

    // Url::join replaces the last path segment unless the base ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_from_config() {
        let config = ProviderConfig {
            host: Some("https://dokploy.example.com".to_string()),
            api_key: Some("secret".to_string()),
            timeout_seconds: Some(10),
            insecure: None,
        };
        let resolved = config.resolve_with(no_env).unwrap();
        assert_eq!(resolved.host.as_str(), "https://dokploy.example.com/");
        assert_eq!(resolved.api_key, "secret");
        assert_eq!(resolved.timeout, Duration::from_secs(10));
        assert!(!resolved.insecure);
    }

    #[test]
    fn test_resolve_env_fallback() {
        let env = |key: &str| match key {
            HOST_ENV => Some("http://localhost:3000/api/".to_string()),
            API_KEY_ENV => Some("from-env".to_string()),
            _ => None,
        };
        let resolved = ProviderConfig::default().resolve_with(env).unwrap();
        assert_eq!(resolved.host.as_str(), "http://localhost:3000/");
        assert_eq!(resolved.api_key, "from-env");
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_wins_over_env() {
        let env = |_: &str| Some("http://env.example.com".to_string());
        let config = ProviderConfig {
            host: Some("http://config.example.com".to_string()),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let resolved = config.resolve_with(env).unwrap();
        assert_eq!(resolved.host.host_str(), Some("config.example.com"));
    }

    #[test]
    fn test_missing_values_report_each_attribute() {
        let diagnostics = ProviderConfig::default().resolve_with(no_env).unwrap_err();
        let attrs: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(attrs, vec!["host", "api_key"]);
    }

    #[test]
    fn test_api_key_must_fit_in_a_header() {
        let config = ProviderConfig {
            host: Some("https://example.com".to_string()),
            api_key: Some("abc\r\ndef".to_string()),
            ..Default::default()
        };
        let diagnostics = config.resolve_with(no_env).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("api_key"));
        assert!(diagnostics[0].summary.contains("Invalid Dokploy API key"));
    }

    #[test]
    fn test_parse_host() {
        assert_eq!(
            parse_host("https://example.com/dokploy").unwrap().as_str(),
            "https://example.com/dokploy/"
        );
        assert!(parse_host("ftp://example.com").is_err());
        assert!(parse_host("not a url").is_err());
    }

    #[test]
    fn test_out_of_range_timeout() {
        let config = ProviderConfig {
            host: Some("https://example.com".to_string()),
            api_key: Some("k".to_string()),
            timeout_seconds: Some(0),
            insecure: None,
        };
        let diagnostics = config.resolve_with(no_env).unwrap_err();
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("timeout_seconds"));
    }

    #[test]
    fn test_schema_validates_block() {
        let schema = provider_schema();
        assert!(validate(&schema, &json!({"host": "https://x", "timeout_seconds": 5})).is_empty());
        assert_eq!(validate(&schema, &json!({"insecure": "yes"})).len(), 1);
        assert_eq!(validate(&schema, &json!({"timeout_seconds": 9000})).len(), 1);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let resolved = ProviderConfig {
            host: Some("https://example.com".to_string()),
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        }
        .resolve_with(no_env)
        .unwrap();
        assert!(!format!("{:?}", resolved).contains("super-secret"));
    }
}
