//! Binance 거래소 커넥터.
//!
//! `GET /api/v3/ticker/price?symbol=<SYMBOL>` 공개 시세 API.

use async_trait::async_trait;
use kimchi_core::{QuoteError, TickerQuote, TickerSnapshot};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::connector::{build_http_client, parse_json, public_get, ConnectorConfig};
use crate::error::{ExchangeError, ExchangeResult};
use crate::traits::TickerSource;

const EXCHANGE: &str = "Binance";

/// 알 수 없는 심볼 에러 코드 (`Invalid symbol.`)
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Binance API 에러 응답.
#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i64,
    msg: String,
}

/// Binance 시세 클라이언트.
pub struct BinanceClient {
    config: ConnectorConfig,
    client: Client,
}

impl BinanceClient {
    /// 새 Binance 클라이언트 생성.
    pub fn new(config: ConnectorConfig) -> ExchangeResult<Self> {
        let client = build_http_client(EXCHANGE, &config)?;
        Ok(Self { config, client })
    }

    /// Binance 심볼은 대문자만 허용됩니다 (예: "btcusdt" → "BTCUSDT").
    pub fn normalize_symbol(symbol: &str) -> String {
        symbol.trim().to_uppercase()
    }

    fn map_error(symbol: &str, status: StatusCode, body: &str) -> ExchangeError {
        match serde_json::from_str::<BinanceError>(body) {
            Ok(err) if err.code == INVALID_SYMBOL_CODE => ExchangeError::SymbolNotFound {
                exchange: EXCHANGE.to_string(),
                symbol: symbol.to_string(),
            },
            Ok(err) => ExchangeError::Api {
                exchange: EXCHANGE.to_string(),
                status: status.as_u16(),
                message: format!("{} (code {})", err.msg, err.code),
            },
            Err(_) => ExchangeError::Api {
                exchange: EXCHANGE.to_string(),
                status: status.as_u16(),
                message: body.to_string(),
            },
        }
    }

    fn parse_ticker(symbol: &str, body: &str) -> ExchangeResult<TickerSnapshot> {
        let record = parse_json(EXCHANGE, body)?;
        if !record.is_object() {
            return Err(ExchangeError::invalid_response(
                EXCHANGE,
                "expected a JSON object",
            ));
        }

        let raw_price = match record.get("price") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(QuoteError::MissingPrice(EXCHANGE.to_string()).into()),
        };

        let symbol = record
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or(symbol)
            .to_string();

        let quote = TickerQuote::parse(symbol, &raw_price, None)?;
        Ok(TickerSnapshot::new(quote, record))
    }
}

#[async_trait]
impl TickerSource for BinanceClient {
    fn name(&self) -> &str {
        EXCHANGE
    }

    async fn get_ticker(&self, symbol: &str) -> ExchangeResult<TickerSnapshot> {
        let symbol = Self::normalize_symbol(symbol);
        let url = self.config.url("/api/v3/ticker/price");
        let (status, body) =
            public_get(&self.client, EXCHANGE, &url, &[("symbol", symbol.as_str())]).await?;

        if !status.is_success() {
            let err = Self::map_error(&symbol, status, &body);
            warn!(symbol = %symbol, status = status.as_u16(), error = %err, "Binance ticker request failed");
            return Err(err);
        }

        Self::parse_ticker(&symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(BinanceClient::normalize_symbol("btcusdt"), "BTCUSDT");
        assert_eq!(BinanceClient::normalize_symbol(" EthUsdt "), "ETHUSDT");
    }

    #[test]
    fn test_parse_string_price() {
        let body = r#"{"symbol":"BTCUSDT","price":"43250.50000000"}"#;
        let snapshot = BinanceClient::parse_ticker("BTCUSDT", body).unwrap();
        assert_eq!(snapshot.quote.price, 43250.5);
        assert_eq!(snapshot.record["price"], "43250.50000000");
    }

    #[test]
    fn test_invalid_symbol_code() {
        let body = r#"{"code":-1121,"msg":"Invalid symbol."}"#;
        let err = BinanceClient::map_error("FOOBAR", StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, ExchangeError::SymbolNotFound { .. }));

        let body = r#"{"code":-1003,"msg":"Too many requests."}"#;
        let err = BinanceClient::map_error("BTCUSDT", StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.upstream_status(), Some(429));
    }

    #[test]
    fn test_zero_or_garbage_price() {
        let err = BinanceClient::parse_ticker("BTCUSDT", r#"{"symbol":"BTCUSDT","price":"0.00"}"#)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Quote(QuoteError::InvalidPrice { .. })));

        let err = BinanceClient::parse_ticker("BTCUSDT", r#"{"symbol":"BTCUSDT","price":"n/a"}"#)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Quote(QuoteError::Unparseable { .. })));

        let err = BinanceClient::parse_ticker("BTCUSDT", r#"{"symbol":"BTCUSDT"}"#).unwrap_err();
        assert!(matches!(err, ExchangeError::Quote(QuoteError::MissingPrice(_))));
    }
}
