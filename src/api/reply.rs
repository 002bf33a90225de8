use std::fmt::Debug;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::errors::BrokerError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// In-memory response writer that broker operations write into.
///
/// Mirrors a streaming HTTP writer: the first status written is the one the
/// client sees, later status writes are dropped, and body writes append.
/// A body write with no status written yet implies 200.
#[derive(Debug, Default)]
pub struct Reply {
    status: Option<StatusCode>,
    content_type: Option<&'static str>,
    body: Vec<u8>,
    header_writes: usize,
    body_writes: usize,
}

impl Reply {
    pub fn new(content_type: &'static str) -> Self {
        Self {
            content_type: Some(content_type),
            ..Default::default()
        }
    }

    /// Single-write JSON reply.
    pub fn json(status: StatusCode, body: Vec<u8>) -> Self {
        let mut reply = Self::new(JSON_CONTENT_TYPE);
        reply.write_header(status);
        reply.write(&body);
        reply
    }

    /// Single-write plain-text reply.
    pub fn text(status: StatusCode, body: &str) -> Self {
        let mut reply = Self::new(TEXT_CONTENT_TYPE);
        reply.write_header(status);
        reply.write(body.as_bytes());
        reply
    }

    pub fn write_header(&mut self, status: StatusCode) {
        self.header_writes += 1;
        match self.status {
            None => self.status = Some(status),
            Some(first) => {
                tracing::warn!(
                    first = first.as_u16(),
                    ignored = status.as_u16(),
                    "superfluous status write"
                );
            }
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body_writes += 1;
        self.body.extend_from_slice(bytes);
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// Number of status writes attempted, including dropped ones.
    pub fn header_writes(&self) -> usize {
        self.header_writes
    }

    pub fn body_writes(&self) -> usize {
        self.body_writes
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Body::from(self.body)).into_response();
        if let Some(ct) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        response
    }
}

/// Encode `value` as JSON, keeping a dump of it for the log on failure.
pub fn encode<T>(what: &'static str, value: &T) -> Result<Vec<u8>, BrokerError>
where
    T: Serialize + Debug,
{
    serde_json::to_vec(value).map_err(|source| BrokerError::Serialization {
        what,
        dump: format!("{:#?}", value),
        source,
    })
}
