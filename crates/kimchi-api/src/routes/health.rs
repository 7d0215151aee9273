//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 업타임 모니터에서 사용합니다. 업스트림은 호출하지 않습니다.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// 서비스 표시 이름.
pub const SERVICE_NAME: &str = "김치스프레드 API";

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 항상 "ok"
    pub status: String,

    /// 서비스 이름
    pub service: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 텔레그램 봇 토큰 설정 여부
    pub telegram_configured: bool,
}

/// 헬스 체크.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        telegram_configured: state.telegram_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use kimchi_core::AppConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_returns_json() {
        let state = Arc::new(AppState::from_config(&AppConfig::default(), None).unwrap());
        let app = Router::new()
            .route("/health", get(health_check))
            .with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
        assert!(!health.telegram_configured);
    }
}
