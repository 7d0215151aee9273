//! Bithumb 거래소 커넥터.
//!
//! `GET /public/ticker/<ORDER>_<PAYMENT>` 공개 시세 API.
//! 응답 봉투(`{"status": "0000", "data": {...}}`) 전체를 원본 레코드로 유지합니다.

use async_trait::async_trait;
use kimchi_core::{QuoteError, TickerQuote, TickerSnapshot};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::connector::{build_http_client, parse_json, public_get, ConnectorConfig};
use crate::error::{ExchangeError, ExchangeResult};
use crate::traits::TickerSource;

const EXCHANGE: &str = "Bithumb";

/// 정상 응답 상태 코드.
const STATUS_OK: &str = "0000";

/// Bithumb 시세 클라이언트.
pub struct BithumbClient {
    config: ConnectorConfig,
    client: Client,
}

impl BithumbClient {
    /// 새 Bithumb 클라이언트 생성.
    pub fn new(config: ConnectorConfig) -> ExchangeResult<Self> {
        let client = build_http_client(EXCHANGE, &config)?;
        Ok(Self { config, client })
    }

    /// 경로 세그먼트로 안전한 심볼인지 확인 (예: "BTC_KRW").
    fn is_path_safe(symbol: &str) -> bool {
        !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    fn parse_ticker(symbol: &str, body: &str) -> ExchangeResult<TickerSnapshot> {
        let envelope = parse_json(EXCHANGE, body)?;

        let status = envelope.get("status").and_then(Value::as_str).unwrap_or("");
        if status != STATUS_OK {
            let message = envelope
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Bithumb API error");
            warn!(symbol, status, message, "Bithumb rejected ticker request");
            return Err(ExchangeError::SymbolNotFound {
                exchange: EXCHANGE.to_string(),
                symbol: symbol.to_string(),
            });
        }

        let data = envelope
            .get("data")
            .ok_or_else(|| ExchangeError::invalid_response(EXCHANGE, "missing data"))?;
        let raw_price = data
            .get("closing_price")
            .and_then(Value::as_str)
            .ok_or_else(|| QuoteError::MissingPrice(EXCHANGE.to_string()))?;

        let mut quote = TickerQuote::parse(symbol, raw_price, None)?;
        if let Some(ts) = data
            .get("date")
            .and_then(Value::as_str)
            .and_then(|d| d.parse::<i64>().ok())
        {
            quote = quote.with_timestamp_ms(ts);
        }

        Ok(TickerSnapshot::new(quote, envelope))
    }
}

#[async_trait]
impl TickerSource for BithumbClient {
    fn name(&self) -> &str {
        EXCHANGE
    }

    async fn get_ticker(&self, symbol: &str) -> ExchangeResult<TickerSnapshot> {
        let symbol = symbol.trim().to_uppercase();
        if !Self::is_path_safe(&symbol) {
            return Err(ExchangeError::SymbolNotFound {
                exchange: EXCHANGE.to_string(),
                symbol,
            });
        }

        let url = self.config.url(&format!("/public/ticker/{}", symbol));
        let (status, body) = public_get(&self.client, EXCHANGE, &url, &[]).await?;

        if !status.is_success() {
            warn!(symbol = %symbol, status = status.as_u16(), "Bithumb ticker request failed");
            return Err(ExchangeError::Api {
                exchange: EXCHANGE.to_string(),
                status: status.as_u16(),
                message: format!("Bithumb API returned status {}", status.as_u16()),
            });
        }

        Self::parse_ticker(&symbol, &body)
    }
}
