//! 요청 처리 시간 제한 middleware.
//!
//! 제한 시간을 넘긴 요청은 다른 에러와 같은 JSON 형식의 408로 응답합니다.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kimchi_core::ProxyError;

use crate::error::ApiError;

/// 요청 타임아웃 레이어.
///
/// `middleware::from_fn_with_state(limit, timeout_layer)`로 등록합니다.
/// 시간이 초과되면 처리 중인 핸들러 future는 drop됩니다.
pub async fn timeout_layer(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::from(ProxyError::Timeout(format!(
            "Request timed out after {}ms",
            limit.as_millis()
        )))
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn test_router(limit: Duration) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route("/fast", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limit, timeout_layer))
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_json_body() {
        let response = test_router(Duration::from_millis(20))
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "REQUEST_TIMEOUT");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_fast_request_passes_through() {
        let response = test_router(Duration::from_secs(5))
            .oneshot(Request::builder().uri("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
