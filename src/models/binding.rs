use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::BrokerError;

pub type Credentials = Map<String, Value>;

/// Body of a successful bind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBindingResponse {
    pub credentials: Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
}

/// Parse the configured credentials string.
///
/// Any JSON object is accepted. `null` yields an empty mapping; every other
/// value, and malformed text, is rejected.
pub fn parse_credentials(raw: &str) -> Result<Credentials, BrokerError> {
    serde_json::from_str::<Option<Credentials>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|source| BrokerError::MalformedCredentials {
            raw: raw.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object() {
        let creds = parse_credentials(r#"{"port": 5514, "host": "syslog-app.snpaas.eu"}"#).unwrap();
        assert_eq!(creds["port"], 5514);
        assert_eq!(creds["host"], "syslog-app.snpaas.eu");
    }

    #[test]
    fn test_parse_nested_values() {
        let creds = parse_credentials(r#"{"uri":"x","opts":{"tls":true},"hosts":["a","b"]}"#).unwrap();
        assert_eq!(creds["opts"], json!({"tls": true}));
        assert_eq!(creds["hosts"], json!(["a", "b"]));
    }

    #[test]
    fn test_null_is_empty() {
        assert!(parse_credentials("null").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_and_non_objects() {
        for raw in ["{not json", "", "[1,2]", "42", "\"text\""] {
            let err = parse_credentials(raw).unwrap_err();
            match err {
                BrokerError::MalformedCredentials { raw: r, .. } => assert_eq!(r, raw),
                other => panic!("unexpected error for {raw:?}: {other}"),
            }
        }
    }

    #[test]
    fn test_drain_url_omitted_when_absent() {
        let resp = ServiceBindingResponse {
            credentials: Credentials::new(),
            syslog_drain_url: None,
        };
        assert_eq!(serde_json::to_value(&resp).unwrap(), json!({"credentials": {}}));
    }
}
