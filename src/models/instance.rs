use serde::{Deserialize, Serialize};

pub const LAST_OPERATION_STATE: &str = "succeeded";
pub const LAST_OPERATION_DESCRIPTION: &str = "async in action";

/// Body of a successful provision (`PUT /v2/service_instances/:id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCreationResponse {
    pub dashboard_url: String,
}

/// Body of `GET .../lastOperation`.
///
/// No operation is ever tracked, so every poll reports success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastOperationResponse {
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl LastOperationResponse {
    pub fn succeeded() -> Self {
        Self {
            state: LAST_OPERATION_STATE.to_string(),
            description: LAST_OPERATION_DESCRIPTION.to_string(),
        }
    }
}
