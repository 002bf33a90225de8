use std::sync::Arc;

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::AppState;

pub mod auth;
pub mod handlers;
pub mod operations;
pub mod reply;

/// Build the broker router: the Open Service Broker v2 routes plus the
/// dashboard, gated by basic auth when configured, and an unauthenticated
/// health probe.
pub fn broker_router(state: Arc<AppState>) -> Router {
    let broker = Router::new()
        .route("/v2/catalog", get(handlers::get_catalog))
        .route(
            "/v2/service_instances/:service_id",
            put(handlers::put_service_instance).delete(handlers::delete_service_instance),
        )
        .route(
            "/v2/service_instances/:service_id/lastOperation",
            get(handlers::get_last_operation),
        )
        .route(
            "/v2/service_instances/:service_id/last_operation",
            get(handlers::get_last_operation),
        )
        .route(
            "/v2/service_instances/:service_id/service_bindings/:service_binding_id",
            put(handlers::put_service_binding).delete(handlers::delete_service_binding),
        )
        .route("/dashboard", get(handlers::show_dashboard));

    let broker = match auth::BasicCredentials::from_config(&state.config) {
        Some(credentials) => {
            tracing::info!("basic authentication enabled for broker routes");
            broker.route_layer(middleware::from_fn_with_state(
                Arc::new(credentials),
                auth::basic_auth,
            ))
        }
        None => broker,
    };

    let timeout = state.config.request_timeout;

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(broker)
        .fallback(fallback_404)
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

async fn fallback_404() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Middleware: tags every response with a unique `x-request-id` so platform
/// errors can be matched to broker log lines.
async fn request_id_middleware(req: Request, next: Next) -> Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(
        request_id = %req_id,
        method = %req.method(),
        path = %req.uri().path(),
        "request received"
    );

    let mut resp = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
