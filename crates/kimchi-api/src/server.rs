//! 서버 조립: 미들웨어 스택과 종료 시그널.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::middleware::{metrics_layer, timeout_layer};
use crate::routes::create_api_router;
use crate::state::AppState;

/// CORS 레이어 생성.
///
/// 브라우저 대시보드가 어디서든 호출할 수 있도록 모든 origin을 허용합니다.
/// OPTIONS 요청은 라우팅 전에 200 빈 본문으로 응답됩니다.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 전체 라우터 생성.
pub fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let api_router = create_api_router()
        .route_layer(middleware::from_fn(metrics_layer))
        .with_state(state);

    Router::new()
        .merge(metrics_router)
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 JSON 에러 반환
        .layer(middleware::from_fn_with_state(request_timeout, timeout_layer))
        .layer(cors_layer())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Shutdown signal received");
}
