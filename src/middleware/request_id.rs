use axum::{body::Body, extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Longest caller-supplied id that is propagated as-is
const MAX_INCOMING_ID_LEN: usize = 128;

/// Correlation id stored in request extensions
#[derive(Clone, Debug, PartialEq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts a caller id if it is short, printable ASCII; `None` otherwise
    pub fn from_header(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?.trim();
        let acceptable = !value.is_empty()
            && value.len() <= MAX_INCOMING_ID_LEN
            && value.chars().all(|c| c.is_ascii_graphic());

        acceptable.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reuses the caller's `x-request-id` or generates one, and echoes it on the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(RequestId::from_header)
        .unwrap_or_else(RequestId::generate);

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// `TraceLayer` span carrying method, path and request id
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(RequestId::as_str)
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_accepts_caller_id() {
        let value = HeaderValue::from_static("frontend-42");
        assert_eq!(
            RequestId::from_header(&value),
            Some(RequestId("frontend-42".to_string()))
        );
    }

    #[test]
    fn test_from_header_rejects_unusable_values() {
        assert_eq!(RequestId::from_header(&HeaderValue::from_static("   ")), None);
        assert_eq!(
            RequestId::from_header(&HeaderValue::from_static("has space")),
            None
        );

        let long = "x".repeat(MAX_INCOMING_ID_LEN + 1);
        let value = HeaderValue::from_str(&long).unwrap();
        assert_eq!(RequestId::from_header(&value), None);
    }

    #[test]
    fn test_generated_ids_are_uuids() {
        let id = RequestId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
