//! 시세 스냅샷 타입.
//!
//! - `TickerQuote` - 검증된 단일 가격
//! - `TickerSnapshot` - 검증된 가격 + 업스트림 원본 레코드

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// 거래소 한 곳에서 관측한 자산 가격.
///
/// `price`는 항상 유한한 양수입니다. 0이나 누락 값은 생성 단계에서 거부됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    /// 마켓/심볼 식별자 (예: "KRW-BTC", "BTCUSDT")
    pub symbol: String,
    /// 현재 체결가
    pub price: f64,
    /// 업스트림이 제공한 관측 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl TickerQuote {
    /// 가격을 검증하여 시세를 생성합니다.
    ///
    /// # Errors
    /// 가격이 NaN, 무한대, 0 이하이면 `QuoteError::InvalidPrice`를 반환합니다.
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, QuoteError> {
        let symbol = symbol.into();
        if !price.is_finite() || price <= 0.0 {
            return Err(QuoteError::InvalidPrice { symbol, price });
        }
        Ok(Self {
            symbol,
            price,
            observed_at,
        })
    }

    /// 문자열 가격(Binance, Bithumb 형식)을 파싱하여 시세를 생성합니다.
    pub fn parse(
        symbol: impl Into<String>,
        raw_price: &str,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, QuoteError> {
        let symbol = symbol.into();
        let price = raw_price
            .trim()
            .parse::<f64>()
            .map_err(|_| QuoteError::Unparseable {
                symbol: symbol.clone(),
                raw: raw_price.to_string(),
            })?;
        Self::new(symbol, price, observed_at)
    }

    /// 밀리초 Unix 타임스탬프를 관측 시각으로 설정합니다.
    #[must_use]
    pub fn with_timestamp_ms(mut self, millis: i64) -> Self {
        self.observed_at = Utc.timestamp_millis_opt(millis).single();
        self
    }
}

/// 프록시 응답에 쓰이는 업스트림 원본 레코드와 검증된 시세.
#[derive(Debug, Clone)]
pub struct TickerSnapshot {
    /// 검증된 가격
    pub quote: TickerQuote,
    /// 업스트림이 돌려준 단일 레코드 (원본 그대로)
    pub record: serde_json::Value,
}

impl TickerSnapshot {
    /// 새 스냅샷을 생성합니다.
    pub fn new(quote: TickerQuote, record: serde_json::Value) -> Self {
        Self { quote, record }
    }
}
