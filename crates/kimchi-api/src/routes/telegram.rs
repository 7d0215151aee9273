//! 텔레그램 알림 전달 endpoint.
//!
//! 필드 검증 → 토큰 확인 → 전달 순서로 처리합니다.
//! 앞의 두 단계에서 실패하면 외부 호출은 일어나지 않습니다.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use kimchi_core::{NotificationPayload, NotificationRequest, ProxyError};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_upstream;
use crate::state::AppState;

/// 전달 성공 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// 요청 본문을 파싱합니다. 빈 본문은 빈 페이로드로 취급합니다.
fn parse_payload(body: &[u8]) -> Result<NotificationPayload, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NotificationPayload::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ProxyError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// 텔레그램 메시지 전달.
///
/// POST /api/telegram `{ "chatId": "...", "message": "..." }`
pub async fn send_telegram(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<TelegramResponse>> {
    let body = body?;
    let payload = parse_payload(&body)?;
    let request = NotificationRequest::try_from(payload)?;

    if let Err(e) = state.notifier.forward(&request).await {
        let err = ApiError::from(e);
        if err.inner().is_upstream_failure() {
            record_upstream(state.notifier.name(), "error");
        }
        return Err(err.with_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    record_upstream(state.notifier.name(), "ok");
    Ok(Json(TelegramResponse {
        success: true,
        message: "Telegram message sent successfully".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let payload = parse_payload(br#"{"chatId": 123456789, "message": "hi"}"#).unwrap();
        let request = NotificationRequest::try_from(payload).unwrap();
        assert_eq!(request.chat_id, "123456789");

        assert!(parse_payload(b"").unwrap().chat_id.is_none());
        assert_eq!(parse_payload(b"{not json").unwrap_err().code(), "BAD_REQUEST");
    }
}
