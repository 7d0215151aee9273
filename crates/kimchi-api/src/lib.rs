//! 김치스프레드 프록시 API 서버.
//!
//! 브라우저 대시보드를 대신해 거래소 시세를 조회하고, USD/KRW 환율을 계산하며,
//! 텔레그램 알림을 전달하는 상태 없는 HTTP 프록시입니다.
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`server`]: 미들웨어 스택 (CORS, trace, timeout) 및 종료 시그널
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`error`]: JSON 에러 응답

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::{detached_metrics_handle, setup_metrics_recorder};
pub use middleware::{metrics_layer, timeout_layer};
pub use routes::*;
pub use server::{cors_layer, create_router, shutdown_signal};
pub use state::AppState;
