//! envvars-broker: an Open Service Broker whose "service" is a fixed set of
//! operator-supplied values.
//!
//! Provisioning and binding are no-ops that succeed immediately; binding
//! hands out the configured credentials.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: config::Config,
}
