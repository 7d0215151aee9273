//! 거래소 에러 타입.

use kimchi_core::{ProxyError, QuoteError};
use thiserror::Error;

/// 거래소 시세 조회 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러 (업스트림에 도달하지 못함)
    #[error("{exchange} network error: {message}")]
    Network { exchange: String, message: String },

    /// 요청 타임아웃
    #[error("{exchange} request timeout: {message}")]
    Timeout { exchange: String, message: String },

    /// 업스트림이 실패 상태 코드를 반환
    #[error("{exchange} API returned status {status}: {message}")]
    Api {
        exchange: String,
        status: u16,
        message: String,
    },

    /// 업스트림이 심볼을 알지 못함
    #[error("Symbol {symbol} not found on {exchange}")]
    SymbolNotFound { exchange: String, symbol: String },

    /// 응답 형식 오류 또는 가격 누락
    #[error("Invalid {exchange} response: {message}")]
    InvalidResponse { exchange: String, message: String },

    /// 시세 값 검증 실패
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

impl ExchangeError {
    /// 응답 형식 오류 생성 헬퍼.
    pub fn invalid_response(exchange: &str, message: impl Into<String>) -> Self {
        ExchangeError::InvalidResponse {
            exchange: exchange.to_string(),
            message: message.into(),
        }
    }

    /// reqwest 전송 에러를 변환합니다.
    pub fn from_transport(exchange: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout {
                exchange: exchange.to_string(),
                message: err.to_string(),
            }
        } else {
            ExchangeError::Network {
                exchange: exchange.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// 업스트림 HTTP 상태 코드 (있는 경우).
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ExchangeError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

impl From<ExchangeError> for ProxyError {
    fn from(err: ExchangeError) -> Self {
        let message = err.to_string();
        match err {
            ExchangeError::SymbolNotFound { .. } => ProxyError::NotFound(message),
            ExchangeError::InvalidResponse { .. } | ExchangeError::Quote(_) => {
                ProxyError::Validation(message)
            }
            ExchangeError::Api {
                exchange, status, ..
            } => ProxyError::upstream(exchange, Some(status), message),
            ExchangeError::Network { exchange, .. } | ExchangeError::Timeout { exchange, .. } => {
                ProxyError::upstream(exchange, None, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_maps_to_not_found() {
        let err = ExchangeError::SymbolNotFound {
            exchange: "Upbit".into(),
            symbol: "KRW-XYZ".into(),
        };
        let proxy: ProxyError = err.into();
        assert_eq!(proxy.status_code(), 404);
        assert_eq!(proxy.to_string(), "찾을 수 없음: Symbol KRW-XYZ not found on Upbit");
    }

    #[test]
    fn test_api_error_keeps_upstream_status() {
        let err = ExchangeError::Api {
            exchange: "Binance".into(),
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.upstream_status(), Some(503));

        match ProxyError::from(err) {
            ProxyError::Upstream { service, status, .. } => {
                assert_eq!(service, "Binance");
                assert_eq!(status, Some(503));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_response_maps_to_validation() {
        let proxy: ProxyError = ExchangeError::invalid_response("Upbit", "missing trade_price").into();
        assert_eq!(proxy.code(), "VALIDATION_ERROR");
    }
}
