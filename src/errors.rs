use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures a broker operation can hit while building its response.
///
/// Both are recovered locally: the caller only ever sees a 500 with an
/// empty body, the detail goes to the log.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        /// `Debug` rendering of the value that failed to encode.
        dump: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load credentials: {source}")]
    MalformedCredentials {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl IntoResponse for BrokerError {
    fn into_response(self) -> Response {
        match &self {
            BrokerError::Serialization { what, dump, source } => {
                tracing::error!(payload = %dump, "could not encode {}: {}", what, source);
            }
            BrokerError::MalformedCredentials { raw, source } => {
                tracing::error!(credentials = %raw, "failed to load credentials: {}", source);
            }
        }

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
