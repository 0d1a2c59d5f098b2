use std::{fmt, str::FromStr};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

/// HTTP header carrying the viewer session
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Key of a viewer session, stored in the request extensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Starts a fresh session key
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Session named by the request's `x-session-id` header, if it holds a UUID
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(SESSION_ID_HEADER)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }

    fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.to_string()).ok()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves which session a request belongs to.
///
/// A request without a usable `x-session-id` starts a new session; the key in
/// use is always echoed back so the client can send it on later requests.
pub async fn session_id_middleware(mut request: Request, next: Next) -> Response {
    let session_id = SessionId::from_headers(request.headers()).unwrap_or_default();
    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;
    if let Some(value) = session_id.header_value() {
        response.headers_mut().insert(SESSION_ID_HEADER, value);
    }
    response
}

/// Span for `TraceLayer` tagged with the caller's session
pub fn make_span_with_session_id(request: &Request<Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session_id = tracing::field::Empty,
    );
    if let Some(id) = request.extensions().get::<SessionId>() {
        span.record("session_id", tracing::field::display(id));
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_header() {
        let raw = "6f1c3a52-8d7e-4f0b-9a5e-1d2c3b4a5f60";
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static(raw));

        let id = SessionId::from_headers(&headers).unwrap();
        assert_eq!(id.to_string(), raw);
        assert_eq!(id.header_value().unwrap(), raw);
    }

    #[test]
    fn test_missing_or_garbled_header_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(SessionId::from_headers(&headers), None);

        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert_eq!(SessionId::from_headers(&headers), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id: SessionId = "0b9e8d7c-6a5f-4e3d-8c2b-1a0f9e8d7c6b".parse().unwrap();
        assert_eq!(
            serde_json::to_value(id).unwrap(),
            serde_json::json!("0b9e8d7c-6a5f-4e3d-8c2b-1a0f9e8d7c6b")
        );
    }
}
