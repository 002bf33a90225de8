use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Service catalog document served at `GET /v2/catalog`.
///
/// The broker always offers exactly one service with exactly one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    pub metadata: ServiceMetadata,
    pub plans: Vec<Plan>,
}

/// Marketplace display fields. Empty values are left out of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long_description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub support_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub free: bool,
}

/// Requirement advertised when bindings carry a syslog drain URL.
pub const SYSLOG_DRAIN_REQUIREMENT: &str = "syslog_drain";

impl Catalog {
    pub fn from_config(config: &Config) -> Self {
        let requires = match config.syslog_drain() {
            Some(_) => vec![SYSLOG_DRAIN_REQUIREMENT.to_string()],
            None => Vec::new(),
        };
        let meta = &config.metadata;

        Catalog {
            services: vec![Service {
                id: service_id(&config.base_guid, &config.service_name),
                name: config.service_name.clone(),
                description: config.service_description.clone(),
                bindable: true,
                tags: split_tags(&config.tags),
                requires,
                metadata: ServiceMetadata {
                    display_name: meta.display_name.clone(),
                    image_url: meta.image_url.clone(),
                    long_description: meta.long_description.clone(),
                    provider_display_name: meta.provider_display_name.clone(),
                    documentation_url: meta.documentation_url.clone(),
                    support_url: meta.support_url.clone(),
                },
                plans: vec![Plan {
                    id: plan_id(&config.base_guid, &config.service_plan),
                    name: config.service_plan.clone(),
                    description: config.service_description.clone(),
                    free: true,
                }],
            }],
        }
    }
}

pub fn service_id(base_guid: &str, service_name: &str) -> String {
    format!("{}-service-{}", base_guid, service_name)
}

pub fn plan_id(base_guid: &str, service_plan: &str) -> String {
    format!("{}-plan-{}", base_guid, service_plan)
}

/// Split a comma-separated tag list. An empty string yields no tags;
/// entries are taken verbatim, without trimming.
pub fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogMetadata;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            port: 3000,
            app_url: "http://localhost:3000".into(),
            base_guid: "BASE".into(),
            service_name: "logs".into(),
            service_plan: "shared".into(),
            service_description: "Shared service for logs".into(),
            auth_user: None,
            auth_password: None,
            syslog_drain_url: None,
            tags: String::new(),
            dashboard_url: "http://localhost:3000/dashboard".into(),
            metadata: CatalogMetadata {
                display_name: "Logs".into(),
                ..Default::default()
            },
            credentials: "{}".into(),
            fake_async: false,
            request_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_single_service_single_plan_with_derived_ids() {
        let catalog = Catalog::from_config(&config());
        assert_eq!(catalog.services.len(), 1);
        let service = &catalog.services[0];
        assert_eq!(service.id, "BASE-service-logs");
        assert_eq!(service.name, "logs");
        assert!(service.bindable);
        assert_eq!(service.plans.len(), 1);
        let plan = &service.plans[0];
        assert_eq!(plan.id, "BASE-plan-shared");
        assert_eq!(plan.name, "shared");
        assert_eq!(plan.description, service.description);
        assert!(plan.free);
    }

    #[test]
    fn test_split_tags() {
        assert!(split_tags("").is_empty());
        assert_eq!(split_tags("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_tags("single"), vec!["single"]);
        assert_eq!(split_tags("a, b"), vec!["a", " b"]);
    }

    #[test]
    fn test_requires_follows_syslog_drain() {
        let catalog = Catalog::from_config(&config());
        assert!(catalog.services[0].requires.is_empty());

        let mut cfg = config();
        cfg.syslog_drain_url = Some("syslog://drain".into());
        let catalog = Catalog::from_config(&cfg);
        assert_eq!(catalog.services[0].requires, vec!["syslog_drain"]);

        cfg.syslog_drain_url = Some(String::new());
        let catalog = Catalog::from_config(&cfg);
        assert!(catalog.services[0].requires.is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let mut cfg = config();
        cfg.tags = "a,b".into();
        let json = serde_json::to_value(Catalog::from_config(&cfg)).unwrap();
        let service = &json["services"][0];
        assert_eq!(service["tags"], serde_json::json!(["a", "b"]));
        assert!(service.get("requires").is_none());
        assert_eq!(service["metadata"]["displayName"], "Logs");
        assert!(service["metadata"].get("imageUrl").is_none());
        assert_eq!(service["plans"][0]["free"], true);
    }

    #[test]
    fn test_empty_tags_serialize_as_empty_list() {
        let json = serde_json::to_value(Catalog::from_config(&config())).unwrap();
        assert_eq!(json["services"][0]["tags"], serde_json::json!([]));
    }
}
