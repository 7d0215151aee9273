//! Upbit 거래소 커넥터.
//!
//! `GET /v1/ticker?markets=<market>` 공개 시세 API.
//! 응답은 배열이며, 단일 마켓 조회 시 첫 번째 원소만 사용합니다.

use async_trait::async_trait;
use kimchi_core::{QuoteError, TickerQuote, TickerSnapshot};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::connector::{build_http_client, parse_json, public_get, ConnectorConfig};
use crate::error::{ExchangeError, ExchangeResult};
use crate::traits::TickerSource;

const EXCHANGE: &str = "Upbit";

/// Upbit 에러 응답: `{"error": {"name": "404", "message": "Code not found"}}`
#[derive(Debug, Deserialize)]
struct UpbitErrorEnvelope {
    error: UpbitError,
}

#[derive(Debug, Deserialize)]
struct UpbitError {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Upbit 시세 클라이언트.
pub struct UpbitClient {
    config: ConnectorConfig,
    client: Client,
}

impl UpbitClient {
    /// 새 Upbit 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::Network`를 반환합니다.
    pub fn new(config: ConnectorConfig) -> ExchangeResult<Self> {
        let client = build_http_client(EXCHANGE, &config)?;
        Ok(Self { config, client })
    }

    /// 에러 응답을 `ExchangeError`로 매핑.
    ///
    /// 존재하지 않는 마켓은 404 `Code not found`로 응답됩니다.
    fn map_error(market: &str, status: StatusCode, body: &str) -> ExchangeError {
        let parsed = serde_json::from_str::<UpbitErrorEnvelope>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|e| e.error.message.clone())
            .unwrap_or_else(|| body.to_string());

        if status == StatusCode::NOT_FOUND {
            return ExchangeError::SymbolNotFound {
                exchange: EXCHANGE.to_string(),
                symbol: market.to_string(),
            };
        }

        if let Some(name) = parsed.as_ref().and_then(|e| e.error.name.as_ref()) {
            debug!(market, error_name = %name, "Upbit error response");
        }

        ExchangeError::Api {
            exchange: EXCHANGE.to_string(),
            status: status.as_u16(),
            message,
        }
    }

    /// 배열 응답에서 첫 레코드를 꺼내 검증합니다.
    fn parse_ticker(market: &str, body: &str) -> ExchangeResult<TickerSnapshot> {
        let value = parse_json(EXCHANGE, body)?;
        let Value::Array(records) = value else {
            return Err(ExchangeError::invalid_response(
                EXCHANGE,
                "expected a JSON array of tickers",
            ));
        };

        let Some(record) = records.into_iter().next() else {
            return Err(ExchangeError::SymbolNotFound {
                exchange: EXCHANGE.to_string(),
                symbol: market.to_string(),
            });
        };

        let price = record
            .get("trade_price")
            .and_then(Value::as_f64)
            .ok_or_else(|| QuoteError::MissingPrice(EXCHANGE.to_string()))?;

        let symbol = record
            .get("market")
            .and_then(Value::as_str)
            .unwrap_or(market)
            .to_string();

        let mut quote = TickerQuote::new(symbol, price, None)?;
        if let Some(ts) = record.get("timestamp").and_then(Value::as_i64) {
            quote = quote.with_timestamp_ms(ts);
        }

        Ok(TickerSnapshot::new(quote, record))
    }
}

#[async_trait]
impl TickerSource for UpbitClient {
    fn name(&self) -> &str {
        EXCHANGE
    }

    async fn get_ticker(&self, market: &str) -> ExchangeResult<TickerSnapshot> {
        let url = self.config.url("/v1/ticker");
        let (status, body) = public_get(&self.client, EXCHANGE, &url, &[("markets", market)]).await?;

        if !status.is_success() {
            let err = Self::map_error(market, status, &body);
            warn!(market, status = status.as_u16(), error = %err, "Upbit ticker request failed");
            return Err(err);
        }

        Self::parse_ticker(market, &body)
    }
}
