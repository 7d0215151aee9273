//! 거래소 시세 프록시 endpoint.
//!
//! 업스트림 레코드를 그대로 반환합니다. 가격이 유효하지 않으면 반환하지 않습니다.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use kimchi_core::ProxyError;
use kimchi_exchange::{ExchangeError, TickerSource};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::metrics::record_upstream;
use crate::state::AppState;

/// 시세 성공 응답의 Cache-Control.
pub const TICKER_CACHE_CONTROL: &str = "public, max-age=1";

/// 시세 조회 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct TickerQuery {
    /// 심볼/마켓 식별자
    pub symbol: Option<String>,
    /// Upbit 마켓 별칭 (`symbol`이 우선)
    pub market: Option<String>,
}

impl TickerQuery {
    /// 비어 있지 않은 심볼을 꺼냅니다.
    fn require_symbol(&self, allow_market_alias: bool) -> Result<String, ProxyError> {
        let alias = if allow_market_alias {
            self.market.as_deref()
        } else {
            None
        };

        self.symbol
            .as_deref()
            .or(alias)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProxyError::bad_request("Missing required parameter: symbol"))
    }
}

fn outcome(err: &ExchangeError) -> &'static str {
    match err {
        ExchangeError::SymbolNotFound { .. } => "not_found",
        ExchangeError::InvalidResponse { .. } | ExchangeError::Quote(_) => "invalid",
        _ => "error",
    }
}

async fn proxy_ticker(source: &dyn TickerSource, symbol: &str) -> ApiResult<impl IntoResponse> {
    debug!(exchange = source.name(), symbol, "Ticker proxy request");

    match source.get_ticker(symbol).await {
        Ok(snapshot) => {
            record_upstream(source.name(), "ok");
            Ok((
                [(header::CACHE_CONTROL, TICKER_CACHE_CONTROL)],
                Json(snapshot.record),
            ))
        }
        Err(e) => {
            record_upstream(source.name(), outcome(&e));
            Err(e.into())
        }
    }
}

/// Upbit 시세 조회.
///
/// GET /api/upbit?symbol=KRW-BTC (별칭: `market`)
pub async fn upbit_ticker(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let symbol = query.require_symbol(true)?;
    proxy_ticker(state.upbit.as_ref(), &symbol).await
}

/// Binance 시세 조회.
///
/// GET /api/binance?symbol=BTCUSDT
pub async fn binance_ticker(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let symbol = query.require_symbol(false)?;
    proxy_ticker(state.binance.as_ref(), &symbol).await
}

/// Bithumb 시세 조회.
///
/// GET /api/bithumb?symbol=BTC_KRW
pub async fn bithumb_ticker(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let symbol = query.require_symbol(false)?;
    proxy_ticker(state.bithumb.as_ref(), &symbol).await
}
