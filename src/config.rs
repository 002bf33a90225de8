use std::num::ParseIntError;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_APP_NAME: &str = "some-service";
const DEFAULT_BASE_GUID: &str = "29140B3F-0E69-4C7E-8A35";
const DEFAULT_PLAN: &str = "shared";
const DEFAULT_CREDENTIALS: &str = "{}";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Broker configuration, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Public URL of the broker application itself.
    pub app_url: String,
    pub base_guid: String,
    pub service_name: String,
    pub service_plan: String,
    pub service_description: String,
    pub auth_user: Option<String>,
    pub auth_password: Option<String>,
    pub syslog_drain_url: Option<String>,
    /// Raw comma-separated tag list, split when the catalog is built.
    pub tags: String,
    pub dashboard_url: String,
    pub metadata: CatalogMetadata,
    /// JSON object handed out verbatim as binding credentials.
    /// Parsed per binding request, so a malformed value only fails binds.
    pub credentials: String,
    /// Report provision/deprovision as accepted (202) and let the platform
    /// poll last operation.
    pub fake_async: bool,
    pub request_timeout: Duration,
}

/// Marketplace display fields of the catalog entry.
#[derive(Debug, Clone, Default)]
pub struct CatalogMetadata {
    pub display_name: String,
    pub image_url: String,
    pub long_description: String,
    pub provider_display_name: String,
    pub documentation_url: String,
    pub support_url: String,
}

impl Config {
    /// Returns the basic-auth pair when both halves are configured.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.auth_user.as_deref(), self.auth_password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }

    /// Syslog drain URL, if one is configured and non-empty.
    pub fn syslog_drain(&self) -> Option<&str> {
        self.syslog_drain_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid BROKER_REQUEST_TIMEOUT_SECS '{value}': {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// The parts of Cloud Foundry's `VCAP_APPLICATION` the broker cares about.
#[derive(Debug, Deserialize)]
struct VcapApplication {
    name: String,
    #[serde(default)]
    application_uris: Vec<String>,
}

/// Resolve configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Resolve configuration through `lookup`. Empty values count as unset.
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
    let var_or = |key: &str, default: String| var(key).unwrap_or(default);

    let port = match var("PORT") {
        Some(value) => value
            .parse()
            .map_err(|source| ConfigError::InvalidPort { value, source })?,
        None => DEFAULT_PORT,
    };

    let vcap = var("VCAP_APPLICATION").and_then(|raw| {
        match serde_json::from_str::<VcapApplication>(&raw) {
            Ok(app) => Some(app),
            Err(e) => {
                tracing::warn!("ignoring unparseable VCAP_APPLICATION: {}", e);
                None
            }
        }
    });

    let (app_name, app_url) = match vcap {
        Some(app) => {
            let url = match app.application_uris.first() {
                Some(uri) => format!("https://{}", uri),
                None => format!("http://localhost:{}", port),
            };
            (app.name, url)
        }
        None => (
            DEFAULT_APP_NAME.to_string(),
            format!("http://localhost:{}", port),
        ),
    };

    let service_name = var_or("SERVICE_NAME", app_name);
    let service_description = var_or(
        "SERVICE_DESCRIPTION",
        format!("Shared service for {}", service_name),
    );

    let metadata = CatalogMetadata {
        display_name: var_or("SERVICE_METADATA_DISPLAYNAME", service_name.clone()),
        image_url: var_or("SERVICE_METADATA_IMAGEURL", String::new()),
        long_description: var_or("SERVICE_METADATA_LONGDESC", service_description.clone()),
        provider_display_name: var_or("SERVICE_METADATA_PROVIDERDISPLAYNAME", String::new()),
        documentation_url: var_or("SERVICE_METADATA_DOCURL", String::new()),
        support_url: var_or("SERVICE_METADATA_SUPPORTURL", String::new()),
    };

    let request_timeout = match var("BROKER_REQUEST_TIMEOUT_SECS") {
        Some(value) => Duration::from_secs(
            value
                .parse()
                .map_err(|source| ConfigError::InvalidTimeout { value, source })?,
        ),
        None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
    };

    Ok(Config {
        port,
        dashboard_url: var_or("SERVICE_DASHBOARD_URL", format!("{}/dashboard", app_url)),
        app_url,
        base_guid: var_or("SERVICE_BASE_GUID", DEFAULT_BASE_GUID.to_string()),
        service_plan: var_or("SERVICE_PLAN", DEFAULT_PLAN.to_string()),
        service_name,
        service_description,
        auth_user: var("SERVICE_AUTH_USER"),
        auth_password: var("SERVICE_AUTH_PASSWORD"),
        syslog_drain_url: var("SYSLOG_DRAIN_URL"),
        tags: var_or("SERVICE_TAGS", String::new()),
        metadata,
        credentials: var_or("SERVICE_CREDENTIALS", DEFAULT_CREDENTIALS.to_string()),
        fake_async: var("SERVICE_FAKE_ASYNC").as_deref() == Some("true"),
        request_timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_outside_cloud_foundry() {
        let cfg = resolve(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.app_url, "http://localhost:3000");
        assert_eq!(cfg.base_guid, "29140B3F-0E69-4C7E-8A35");
        assert_eq!(cfg.service_name, "some-service");
        assert_eq!(cfg.service_plan, "shared");
        assert_eq!(cfg.service_description, "Shared service for some-service");
        assert_eq!(cfg.dashboard_url, "http://localhost:3000/dashboard");
        assert_eq!(cfg.credentials, "{}");
        assert_eq!(cfg.tags, "");
        assert!(!cfg.fake_async);
        assert!(cfg.syslog_drain().is_none());
        assert!(cfg.basic_auth().is_none());
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
        assert_eq!(cfg.metadata.display_name, "some-service");
        assert_eq!(cfg.metadata.long_description, "Shared service for some-service");
        assert_eq!(cfg.metadata.image_url, "");
    }

    #[test]
    fn test_vcap_application_sets_name_and_url() {
        let cfg = resolve(&[(
            "VCAP_APPLICATION",
            r#"{"name":"my-broker","application_uris":["my-broker.apps.example.com"]}"#,
        )])
        .unwrap();
        assert_eq!(cfg.service_name, "my-broker");
        assert_eq!(cfg.app_url, "https://my-broker.apps.example.com");
        assert_eq!(cfg.dashboard_url, "https://my-broker.apps.example.com/dashboard");
        assert_eq!(cfg.service_description, "Shared service for my-broker");
    }

    #[test]
    fn test_malformed_vcap_application_is_ignored() {
        let cfg = resolve(&[("VCAP_APPLICATION", "{nope")]).unwrap();
        assert_eq!(cfg.service_name, "some-service");
        assert_eq!(cfg.app_url, "http://localhost:3000");
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let cfg = resolve(&[
            ("SERVICE_PLAN", ""),
            ("SERVICE_CREDENTIALS", ""),
            ("SYSLOG_DRAIN_URL", ""),
            ("PORT", ""),
        ])
        .unwrap();
        assert_eq!(cfg.service_plan, "shared");
        assert_eq!(cfg.credentials, "{}");
        assert!(cfg.syslog_drain_url.is_none());
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let cfg = resolve(&[
            ("PORT", "8080"),
            ("SERVICE_NAME", "logging"),
            ("SERVICE_PLAN", "gold"),
            ("SERVICE_TAGS", "a,b,c"),
            ("SYSLOG_DRAIN_URL", "syslog://drain"),
            ("SERVICE_DASHBOARD_URL", "https://dash.example.com"),
            ("SERVICE_METADATA_DISPLAYNAME", "Logging"),
            ("SERVICE_AUTH_USER", "admin"),
            ("SERVICE_AUTH_PASSWORD", "secret"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.app_url, "http://localhost:8080");
        assert_eq!(cfg.service_name, "logging");
        assert_eq!(cfg.service_plan, "gold");
        assert_eq!(cfg.tags, "a,b,c");
        assert_eq!(cfg.syslog_drain(), Some("syslog://drain"));
        assert_eq!(cfg.dashboard_url, "https://dash.example.com");
        assert_eq!(cfg.metadata.display_name, "Logging");
        assert_eq!(cfg.basic_auth(), Some(("admin", "secret")));
    }

    #[test]
    fn test_basic_auth_requires_both_halves() {
        let cfg = resolve(&[("SERVICE_AUTH_USER", "admin")]).unwrap();
        assert!(cfg.basic_auth().is_none());
        let cfg = resolve(&[("SERVICE_AUTH_PASSWORD", "secret")]).unwrap();
        assert!(cfg.basic_auth().is_none());
    }

    #[test]
    fn test_fake_async_only_for_literal_true() {
        assert!(resolve(&[("SERVICE_FAKE_ASYNC", "true")]).unwrap().fake_async);
        assert!(!resolve(&[("SERVICE_FAKE_ASYNC", "TRUE")]).unwrap().fake_async);
        assert!(!resolve(&[("SERVICE_FAKE_ASYNC", "1")]).unwrap().fake_async);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = resolve(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let err = resolve(&[("BROKER_REQUEST_TIMEOUT_SECS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }
}
