//! Broker operations as plain functions of configuration and path identifiers.
//!
//! Path identifiers only show up in the log. Nothing is validated against
//! them and nothing is remembered between calls.

use axum::http::StatusCode;

use super::reply::{encode, Reply, JSON_CONTENT_TYPE};
use crate::config::Config;
use crate::errors::BrokerError;
use crate::models::binding::{parse_credentials, ServiceBindingResponse};
use crate::models::catalog::Catalog;
use crate::models::instance::{LastOperationResponse, ServiceCreationResponse};

const EMPTY_OBJECT: &[u8] = b"{}";
const DASHBOARD_BODY: &str = "Dashboard";

pub fn catalog(config: &Config) -> Result<Reply, BrokerError> {
    let catalog = Catalog::from_config(config);
    let body = encode("catalog", &catalog)?;
    Ok(Reply::json(StatusCode::OK, body))
}

pub fn last_operation() -> Result<Reply, BrokerError> {
    let body = encode("last operation", &LastOperationResponse::succeeded())?;
    Ok(Reply::json(StatusCode::OK, body))
}

/// Provision: 201, or 202 when faking asynchronous completion.
pub fn create_instance(config: &Config, instance_id: &str) -> Result<Reply, BrokerError> {
    tracing::info!(
        "Creating service instance {} for service {} plan {}",
        instance_id,
        config.service_name,
        config.service_plan
    );

    let instance = ServiceCreationResponse {
        dashboard_url: config.dashboard_url.clone(),
    };
    let body = encode("service instance", &instance)?;

    let status = if config.fake_async {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CREATED
    };
    Ok(Reply::json(status, body))
}

/// Deprovision.
///
/// With fake async the 202 write is not followed by a return, so the 200
/// branch writes as well: the client sees 202 and the body `{}{}`.
pub fn delete_instance(config: &Config, instance_id: &str) -> Reply {
    tracing::info!(
        "Deleting service instance {} for service {} plan {}",
        instance_id,
        config.service_name,
        config.service_plan
    );

    let mut reply = Reply::new(JSON_CONTENT_TYPE);
    if config.fake_async {
        reply.write_header(StatusCode::ACCEPTED);
        reply.write(EMPTY_OBJECT);
    }
    reply.write_header(StatusCode::OK);
    reply.write(EMPTY_OBJECT);
    reply
}

pub fn create_binding(
    config: &Config,
    instance_id: &str,
    binding_id: &str,
) -> Result<Reply, BrokerError> {
    tracing::info!(
        "Creating service binding {} for service {} plan {} instance {}",
        binding_id,
        config.service_name,
        config.service_plan,
        instance_id
    );

    let credentials = parse_credentials(&config.credentials)?;
    let binding = ServiceBindingResponse {
        credentials,
        syslog_drain_url: config.syslog_drain().map(String::from),
    };
    let body = encode("binding", &binding)?;
    Ok(Reply::json(StatusCode::CREATED, body))
}

pub fn delete_binding(config: &Config, instance_id: &str, binding_id: &str) -> Reply {
    tracing::info!(
        "Delete service binding {} for service {} plan {} instance {}",
        binding_id,
        config.service_name,
        config.service_plan,
        instance_id
    );
    Reply::json(StatusCode::OK, EMPTY_OBJECT.to_vec())
}

pub fn dashboard(config: &Config) -> Reply {
    tracing::info!(
        "Show dashboard for service {} plan {}",
        config.service_name,
        config.service_plan
    );
    Reply::text(StatusCode::OK, DASHBOARD_BODY)
}
