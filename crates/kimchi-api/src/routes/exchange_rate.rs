//! USD/KRW 환율 endpoint.
//!
//! 계산에 실패하면 에러 대신 고정 환율을 `source: "Fallback"`으로 표시하여 반환합니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use kimchi_core::{ExchangeRateResult, ProxyError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::client_message;
use crate::metrics::{record_exchange_rate_fallback, record_upstream};
use crate::state::AppState;

/// Fallback 응답의 `source` 값.
pub const FALLBACK_SOURCE: &str = "Fallback";

/// 환율 맵. USD는 항상 1입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rates {
    #[serde(rename = "USD")]
    pub usd: f64,
    #[serde(rename = "KRW")]
    pub krw: f64,
}

/// 계산 과정 (관측용).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDebug {
    pub btc_krw: f64,
    pub btc_usdt: f64,
    pub calculation: String,
}

/// 환율 성공 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateResponse {
    pub source: String,
    pub timestamp: String,
    pub rates: Rates,
    pub debug: RateDebug,
}

impl ExchangeRateResponse {
    fn new(source: String, result: &ExchangeRateResult) -> Self {
        Self {
            source,
            timestamp: result.computed_at.to_rfc3339(),
            rates: Rates {
                usd: 1.0,
                krw: result.rate,
            },
            debug: RateDebug {
                btc_krw: result.krw_quote.price,
                btc_usdt: result.usdt_quote.price,
                calculation: result.calculation(),
            },
        }
    }
}

/// 환율 fallback 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackResponse {
    pub error: String,
    pub source: String,
    pub timestamp: String,
    pub rates: Rates,
    pub note: String,
}

/// USD/KRW 환율 조회.
///
/// GET /api/exchange-rate
pub async fn exchange_rate(State(state): State<Arc<AppState>>) -> Response {
    match state.deriver.derive().await {
        Ok(result) => {
            record_upstream("exchange-rate", "ok");
            (
                [(header::CACHE_CONTROL, "public, max-age=2")],
                Json(ExchangeRateResponse::new(state.deriver.source_label(), &result)),
            )
                .into_response()
        }
        Err(e) => {
            let err = ProxyError::from(e);
            record_upstream("exchange-rate", "error");
            record_exchange_rate_fallback();
            warn!(
                code = err.code(),
                error = %err,
                fallback_krw = state.fallback_krw,
                "Exchange rate derivation failed, using fallback"
            );

            let body = FallbackResponse {
                error: client_message(&err),
                source: FALLBACK_SOURCE.to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                rates: Rates {
                    usd: 1.0,
                    krw: state.fallback_krw,
                },
                note: "Using fallback exchange rate".to_string(),
            };

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CACHE_CONTROL, "no-cache")],
                Json(body),
            )
                .into_response()
        }
    }
}
