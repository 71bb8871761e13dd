//! Request identification.
//!
//! # Responsibilities
//! - Assign a UUID v4 `x-request-id` to requests that lack one
//! - Echo the request ID on the response
//! - Open a trace span per request
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An ID already present on the request is kept and forwarded to the origin

use axum::{
    http::{HeaderMap, HeaderName},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID of a request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Wrap `router` with request ID assignment, propagation and tracing.
pub fn with_request_tracing(router: Router) -> Router {
    router
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn seen_id(headers: HeaderMap) -> String {
        request_id(&headers).to_string()
    }

    #[tokio::test]
    async fn test_assigns_and_echoes_request_id() {
        let app = with_request_tracing(Router::new().route("/", get(seen_id)));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let echoed = response.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap().to_string();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, echoed.as_bytes());
        assert!(uuid::Uuid::parse_str(&echoed).is_ok());
    }

    #[tokio::test]
    async fn test_keeps_existing_request_id() {
        let app = with_request_tracing(Router::new().route("/", get(seen_id)));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "abc-123");
    }

    #[test]
    fn test_unknown_when_missing() {
        assert_eq!(request_id(&HeaderMap::new()), "unknown");
    }
}
