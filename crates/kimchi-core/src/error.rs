//! 프록시 서비스의 에러 타입.
//!
//! 모든 라우트가 공유하는 에러 분류 체계를 정의합니다.
//! 각 크레이트의 세부 에러(`ExchangeError`, `NotificationError`)는
//! `From` 변환을 통해 [`ProxyError`]로 모입니다.

use thiserror::Error;

/// 요청 처리 중 발생하는 에러 분류.
///
/// 모든 에러는 해당 요청에서 종결되며, 재시도나 로컬 복구는 없습니다.
/// (예외: 환율 라우트는 fallback 값을 대신 반환합니다.)
#[derive(Debug, Error)]
pub enum ProxyError {
    /// 호출자 입력 누락/오류 (400)
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 업스트림에 해당 식별자의 레코드가 없음 (404)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 업스트림 실패 상태 코드 또는 전송 실패 (502)
    #[error("{service} 업스트림 에러: {message}")]
    Upstream {
        /// 업스트림 서비스 이름 (예: "Upbit")
        service: String,
        /// 업스트림 HTTP 상태 코드 (전송 실패 시 None)
        status: Option<u16>,
        /// 사람이 읽을 수 있는 메시지
        message: String,
    },

    /// 업스트림 응답 형식 오류, 가격 필드 누락 (502)
    #[error("응답 검증 실패: {0}")]
    Validation(String),

    /// 운영자 설정(시크릿) 누락 (500)
    #[error("설정 에러: {0}")]
    Configuration(String),

    /// 허용되지 않는 HTTP 메서드 (405)
    #[error("허용되지 않는 메서드: {method}")]
    MethodNotAllowed {
        /// 요청된 메서드
        method: String,
        /// 허용되는 메서드 목록
        allowed: Vec<String>,
    },

    /// 서버 요청 처리 시간 초과 (408)
    #[error("요청 시간 초과: {0}")]
    Timeout(String),
}

impl ProxyError {
    /// 기계가 읽을 수 있는 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::BadRequest(_) => "BAD_REQUEST",
            ProxyError::NotFound(_) => "NOT_FOUND",
            ProxyError::Upstream { .. } => "UPSTREAM_ERROR",
            ProxyError::Validation(_) => "VALIDATION_ERROR",
            ProxyError::Configuration(_) => "CONFIGURATION_ERROR",
            ProxyError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            ProxyError::Timeout(_) => "REQUEST_TIMEOUT",
        }
    }

    /// 기본 HTTP 상태 코드.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::BadRequest(_) => 400,
            ProxyError::NotFound(_) => 404,
            ProxyError::MethodNotAllowed { .. } => 405,
            ProxyError::Timeout(_) => 408,
            ProxyError::Upstream { .. } | ProxyError::Validation(_) => 502,
            ProxyError::Configuration(_) => 500,
        }
    }

    /// 업스트림 측 실패인지 확인합니다.
    ///
    /// 호출자 입력 문제(`BadRequest`)나 운영 설정 문제(`Configuration`)와
    /// 구분하기 위해 사용합니다.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, ProxyError::Upstream { .. } | ProxyError::Validation(_))
    }

    /// `BadRequest` 생성 헬퍼.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ProxyError::BadRequest(message.into())
    }

    /// `Upstream` 생성 헬퍼.
    pub fn upstream(
        service: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        ProxyError::Upstream {
            service: service.into(),
            status,
            message: message.into(),
        }
    }
}

/// 시세 값 검증 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// 가격이 유한한 양수가 아님
    #[error("{symbol} 가격이 유효하지 않습니다: {price}")]
    InvalidPrice { symbol: String, price: f64 },

    /// 가격 필드 누락
    #[error("{0} 응답에 가격 필드가 없습니다")]
    MissingPrice(String),

    /// 가격 문자열 파싱 실패
    #[error("{symbol} 가격을 파싱할 수 없습니다: {raw}")]
    Unparseable { symbol: String, raw: String },

    /// 환율 계산 결과가 유한한 양수가 아님
    #[error("계산된 환율이 유효하지 않습니다: {0}")]
    InvalidRate(f64),
}

impl From<QuoteError> for ProxyError {
    fn from(err: QuoteError) -> Self {
        ProxyError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ProxyError::bad_request("symbol").status_code(), 400);
        assert_eq!(ProxyError::NotFound("KRW-XYZ".into()).status_code(), 404);
        assert_eq!(
            ProxyError::upstream("Upbit", Some(503), "unavailable").status_code(),
            502
        );
        assert_eq!(ProxyError::Validation("no price".into()).status_code(), 502);
        assert_eq!(ProxyError::Configuration("token".into()).status_code(), 500);
        assert_eq!(
            ProxyError::MethodNotAllowed {
                method: "PUT".into(),
                allowed: vec!["GET".into()],
            }
            .status_code(),
            405
        );
        assert_eq!(ProxyError::Timeout("30s".into()).status_code(), 408);
    }

    #[test]
    fn test_not_found_is_not_upstream_failure() {
        assert!(!ProxyError::NotFound("BTCXYZ".into()).is_upstream_failure());
        assert!(ProxyError::upstream("Binance", None, "connect refused").is_upstream_failure());
        assert!(ProxyError::Validation("empty".into()).is_upstream_failure());
    }

    #[test]
    fn test_quote_error_becomes_validation() {
        let err: ProxyError = QuoteError::MissingPrice("Upbit".into()).into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
