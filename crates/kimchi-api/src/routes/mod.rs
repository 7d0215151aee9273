//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - API 설명 문서
//! - `/health` - 헬스 체크
//! - `/api/upbit` - Upbit 시세 프록시
//! - `/api/binance` - Binance 시세 프록시
//! - `/api/bithumb` - Bithumb 시세 프록시
//! - `/api/exchange-rate` - USD/KRW 환율
//! - `/api/telegram` - 텔레그램 알림 전달

pub mod docs;
pub mod exchange_rate;
pub mod health;
pub mod telegram;
pub mod tickers;

pub use docs::api_docs;
pub use exchange_rate::{exchange_rate, ExchangeRateResponse, FallbackResponse, Rates, FALLBACK_SOURCE};
pub use health::{health_check, HealthResponse};
pub use telegram::{send_telegram, TelegramResponse};
pub use tickers::{binance_ticker, bithumb_ticker, upbit_ticker, TickerQuery};

use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    routing::{get, post},
    Router,
};
use kimchi_core::ProxyError;

use crate::error::ApiError;
use crate::state::AppState;

/// GET 전용 라우트의 잘못된 메서드 처리.
async fn get_only(method: Method) -> ApiError {
    ApiError::method_not_allowed(&method, &[Method::GET, Method::OPTIONS])
}

/// POST 전용 라우트의 잘못된 메서드 처리.
async fn post_only(method: Method) -> ApiError {
    ApiError::method_not_allowed(&method, &[Method::POST, Method::OPTIONS])
}

/// 알 수 없는 경로.
async fn route_not_found(uri: Uri) -> ApiError {
    ProxyError::NotFound(format!("Route {} not found", uri.path())).into()
}

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api_docs).fallback(get_only))
        .route("/health", get(health_check).fallback(get_only))
        .route("/api/upbit", get(upbit_ticker).fallback(get_only))
        .route("/api/binance", get(binance_ticker).fallback(get_only))
        .route("/api/bithumb", get(bithumb_ticker).fallback(get_only))
        .route("/api/exchange-rate", get(exchange_rate).fallback(get_only))
        .route("/api/telegram", post(send_telegram).fallback(post_only))
        .fallback(route_not_found)
}
