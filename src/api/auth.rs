use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use subtle::ConstantTimeEq;

use crate::config::Config;

pub const REALM: &str = "Authorization Required";

/// Username/password pair every broker request must present.
#[derive(Clone)]
pub struct BasicCredentials {
    user: String,
    password: String,
}

// SECURITY: never print the password
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

impl BasicCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Auth is only switched on when both username and password are set.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .basic_auth()
            .map(|(user, password)| Self::new(user, password))
    }

    /// Check an `Authorization` header value against these credentials.
    pub fn matches(&self, authorization: &str) -> bool {
        let Some((user, password)) = decode_basic(authorization) else {
            return false;
        };
        let user_ok = user.as_bytes().ct_eq(self.user.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & password_ok).into()
    }
}

/// Decode `Basic <base64(user:password)>`. The scheme is case-insensitive.
pub fn decode_basic(authorization: &str) -> Option<(String, String)> {
    let (scheme, encoded) = authorization.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, password) = text.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Middleware: rejects requests without valid basic credentials.
pub async fn basic_auth(
    State(credentials): State<Arc<BasicCredentials>>,
    req: Request,
    next: Next,
) -> Response {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| credentials.matches(v))
        .unwrap_or(false);

    if authorized {
        return next.run(req).await;
    }

    tracing::warn!(
        method = %req.method(),
        path = %req.uri().path(),
        "rejected request with missing or invalid basic credentials"
    );
    unauthorized()
}

fn unauthorized() -> Response {
    let challenge = HeaderValue::from_static("Basic realm=\"Authorization Required\"");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, challenge)],
        "Unauthorized",
    )
        .into_response()
}
