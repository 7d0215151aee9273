//! 거래소 REST 커넥터.
//!
//! 모두 인증이 필요 없는 공개 시세 엔드포인트만 사용합니다.

pub mod binance;
pub mod bithumb;
pub mod upbit;

pub use binance::BinanceClient;
pub use bithumb::BithumbClient;
pub use upbit::UpbitClient;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{ExchangeError, ExchangeResult};

/// 커넥터 공통 설정.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// REST API 기본 URL (끝의 `/` 없이)
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl ConnectorConfig {
    /// 새 설정 생성.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: 10,
        }
    }

    /// 타임아웃 설정.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// 타임아웃이 설정된 HTTP 클라이언트 생성.
///
/// # Errors
/// TLS 백엔드 초기화에 실패하면 `ExchangeError::Network`를 반환합니다.
pub(crate) fn build_http_client(exchange: &str, config: &ConnectorConfig) -> ExchangeResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| ExchangeError::Network {
            exchange: exchange.to_string(),
            message: format!("HTTP 클라이언트 생성 실패: {}", e),
        })
}

/// 공개 GET 요청을 보내고 상태 코드와 본문을 반환합니다.
///
/// 상태 코드 해석은 거래소마다 다르므로 호출자가 처리합니다.
pub(crate) async fn public_get(
    client: &Client,
    exchange: &str,
    url: &str,
    query: &[(&str, &str)],
) -> ExchangeResult<(StatusCode, String)> {
    debug!(exchange, url, ?query, "GET");

    let response = client
        .get(url)
        .query(query)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| ExchangeError::from_transport(exchange, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ExchangeError::from_transport(exchange, e))?;

    Ok((status, body))
}

/// JSON 본문 파싱. 실패하면 응답 형식 오류로 취급합니다.
pub(crate) fn parse_json(exchange: &str, body: &str) -> ExchangeResult<serde_json::Value> {
    serde_json::from_str(body)
        .map_err(|e| ExchangeError::invalid_response(exchange, format!("malformed JSON: {}", e)))
}
