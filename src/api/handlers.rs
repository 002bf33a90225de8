use std::sync::Arc;

use axum::extract::{Path, State};

use super::operations;
use super::reply::Reply;
use crate::errors::BrokerError;
use crate::AppState;

// ── Catalog ──────────────────────────────────────────────────

/// GET /v2/catalog
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Result<Reply, BrokerError> {
    operations::catalog(&state.config)
}

// ── Service instances ────────────────────────────────────────

/// GET /v2/service_instances/:service_id/lastOperation
pub async fn get_last_operation(Path(service_id): Path<String>) -> Result<Reply, BrokerError> {
    tracing::debug!(service_id = %service_id, "last operation polled");
    operations::last_operation()
}

/// PUT /v2/service_instances/:service_id
pub async fn put_service_instance(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<Reply, BrokerError> {
    operations::create_instance(&state.config, &service_id)
}

/// DELETE /v2/service_instances/:service_id
pub async fn delete_service_instance(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Reply {
    operations::delete_instance(&state.config, &service_id)
}

// ── Service bindings ─────────────────────────────────────────

/// PUT /v2/service_instances/:service_id/service_bindings/:service_binding_id
pub async fn put_service_binding(
    State(state): State<Arc<AppState>>,
    Path((service_id, binding_id)): Path<(String, String)>,
) -> Result<Reply, BrokerError> {
    operations::create_binding(&state.config, &service_id, &binding_id)
}

/// DELETE /v2/service_instances/:service_id/service_bindings/:service_binding_id
pub async fn delete_service_binding(
    State(state): State<Arc<AppState>>,
    Path((service_id, binding_id)): Path<(String, String)>,
) -> Reply {
    operations::delete_binding(&state.config, &service_id, &binding_id)
}

// ── Dashboard ────────────────────────────────────────────────

/// GET /dashboard
pub async fn show_dashboard(State(state): State<Arc<AppState>>) -> Reply {
    operations::dashboard(&state.config)
}
