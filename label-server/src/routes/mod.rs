use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::AppState;

pub mod health;
pub mod labels;
pub mod returns;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/returns", returns::router())
        .nest("/api/labels", labels::router())
        .nest("/api/health", health::router())
}

/// Build the fully configured application with all middleware.
pub fn build_app(state: AppState) -> Router {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
        build_app(AppState::initialize(config))
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn item() -> serde_json::Value {
        json!({
            "Date": "2024-03-05",
            "Order #": 100,
            "SKU": "IVM-100",
            "Actual": 2,
            "IVC Status": "PASS",
            "_meta": { "_lobId": 19816 }
        })
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_zpl_route_renders_command_text() {
        let response = test_app()
            .oneshot(post_json("/api/labels/zpl", json!({ "item": item() })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        // Actual quantity of 2 yields two label formats.
        assert_eq!(body.matches("^XA").count(), 2);
        assert!(body.contains("^FDIVM-100^FS"));
    }

    #[tokio::test]
    async fn test_missing_sku_is_rejected() {
        let response = test_app()
            .oneshot(post_json("/api/labels/zpl", json!({ "item": { "Order #": 1 } })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_zpl_all_reports_label_count() {
        let response = test_app()
            .oneshot(post_json(
                "/api/labels/zpl-all",
                json!({ "items": [item(), item()] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-label-count").unwrap(),
            &HeaderValue::from_static("4")
        );
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let response = test_app()
            .oneshot(post_json("/api/labels/zpl-all", json!({ "items": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_pdf_streams_inline() {
        let response = test_app()
            .oneshot(post_json(
                "/api/labels/preview-pdf",
                json!({ "item": item(), "count": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            &HeaderValue::from_static("application/pdf")
        );
        let disposition = response.headers().get("content-disposition").unwrap();
        assert!(disposition.to_str().unwrap().starts_with("inline"));

        let body = body_bytes(response).await;
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_search_requires_order_number() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/returns/search")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_print_requires_printer_host() {
        let response = test_app()
            .oneshot(post_json("/api/labels/print-zpl", json!({ "item": item() })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
