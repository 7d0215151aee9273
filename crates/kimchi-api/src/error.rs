//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트가 같은 JSON 에러 형식을 사용합니다.
//!
//! ```json
//! {
//!   "code": "NOT_FOUND",
//!   "message": "Symbol KRW-XYZ not found on Upbit",
//!   "timestamp": "2026-01-01T00:00:00Z"
//! }
//! ```

use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use kimchi_core::ProxyError;
use kimchi_exchange::ExchangeError;
use kimchi_notification::NotificationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

/// API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "BAD_REQUEST", "UPSTREAM_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 시각 (ISO 8601)
    pub timestamp: String,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// 핸들러에서 반환하는 에러.
///
/// [`ProxyError`]를 감싸며, 라우트별로 HTTP 상태 코드를 덮어쓸 수 있습니다.
#[derive(Debug)]
pub struct ApiError {
    error: ProxyError,
    status: Option<StatusCode>,
}

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 상태 코드를 덮어씁니다.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// 허용되지 않는 메서드 에러.
    pub fn method_not_allowed(method: &Method, allowed: &[Method]) -> Self {
        ProxyError::MethodNotAllowed {
            method: method.to_string(),
            allowed: allowed.iter().map(ToString::to_string).collect(),
        }
        .into()
    }

    /// 내부 에러 참조.
    pub fn inner(&self) -> &ProxyError {
        &self.error
    }

    /// 응답에 쓸 HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or_else(|| {
            StatusCode::from_u16(self.error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        })
    }

    /// 응답 본문 생성.
    pub fn to_response_body(&self) -> ApiErrorResponse {
        let mut body = ApiErrorResponse::new(self.error.code(), client_message(&self.error));
        body.details = error_details(&self.error);
        body
    }
}

impl From<ProxyError> for ApiError {
    fn from(error: ProxyError) -> Self {
        Self {
            error,
            status: None,
        }
    }
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        ProxyError::from(err).into()
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        ProxyError::from(err).into()
    }
}

// axum 추출기 거부도 같은 JSON 형식으로 응답합니다. 상태 코드(예: 413)는 유지합니다.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::from(ProxyError::bad_request(rejection.body_text()))
            .with_status(rejection.status())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::from(ProxyError::bad_request(rejection.body_text()))
            .with_status(rejection.status())
    }
}

/// 호출자에게 보여줄 메시지 (분류 접두어 없이).
pub fn client_message(err: &ProxyError) -> String {
    match err {
        ProxyError::BadRequest(m)
        | ProxyError::NotFound(m)
        | ProxyError::Validation(m)
        | ProxyError::Configuration(m)
        | ProxyError::Timeout(m) => m.clone(),
        ProxyError::Upstream { message, .. } => message.clone(),
        ProxyError::MethodNotAllowed { method, .. } => format!("Method {} not allowed", method),
    }
}

fn error_details(err: &ProxyError) -> Option<Value> {
    match err {
        ProxyError::Upstream {
            service, status, ..
        } => Some(json!({ "service": service, "upstreamStatus": status })),
        ProxyError::MethodNotAllowed { allowed, .. } => Some(json!({ "allowed": allowed })),
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.to_response_body();

        if status.is_server_error() {
            error!(code = %body.code, status = status.as_u16(), message = %body.message, "Request failed");
        } else {
            warn!(code = %body.code, status = status.as_u16(), message = %body.message, "Request rejected");
        }

        let mut response = (status, Json(body)).into_response();

        if let ProxyError::MethodNotAllowed { allowed, .. } = &self.error {
            if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = ProxyError::bad_request("Missing required parameter: symbol").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = ProxyError::upstream("Upbit", Some(503), "down").into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = err.with_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_body_has_no_category_prefix() {
        let err: ApiError = ProxyError::NotFound("Symbol KRW-XYZ not found on Upbit".into()).into();
        let body = err.to_response_body();

        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.message, "Symbol KRW-XYZ not found on Upbit");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_method_not_allowed_details() {
        let err = ApiError::method_not_allowed(&Method::DELETE, &[Method::GET, Method::OPTIONS]);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body = err.to_response_body();
        assert_eq!(body.details.unwrap()["allowed"], json!(["GET", "OPTIONS"]));

        let response = err.into_response();
        assert_eq!(response.headers()[header::ALLOW], "GET, OPTIONS");
    }
}
