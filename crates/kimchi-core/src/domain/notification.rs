//! 알림 전달 요청 타입.

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// 와이어 상의 채팅 ID.
///
/// 텔레그램 채팅 ID는 숫자지만 클라이언트는 문자열로도 보냅니다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChatIdValue {
    Text(String),
    Number(i64),
}

impl ChatIdValue {
    fn into_string(self) -> String {
        match self {
            ChatIdValue::Text(s) => s.trim().to_string(),
            ChatIdValue::Number(n) => n.to_string(),
        }
    }
}

/// `POST /api/telegram` 요청 본문 (검증 전).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// 대상 채팅 ID
    #[serde(default)]
    pub chat_id: Option<ChatIdValue>,
    /// 전달할 메시지 (HTML 포맷 허용)
    #[serde(default)]
    pub message: Option<String>,
}

/// 검증된 알림 요청.
///
/// 두 필드 모두 비어 있지 않습니다. 메시지 본문은 그대로 전달됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    pub chat_id: String,
    pub message: String,
}

impl NotificationRequest {
    /// 새 알림 요청을 생성합니다.
    ///
    /// # Errors
    /// `chat_id` 또는 `message`가 비어 있으면 `ProxyError::BadRequest`를 반환합니다.
    pub fn new(chat_id: impl Into<String>, message: impl Into<String>) -> Result<Self, ProxyError> {
        let chat_id = chat_id.into();
        let message = message.into();

        let mut missing = Vec::new();
        if chat_id.trim().is_empty() {
            missing.push("chatId");
        }
        if message.trim().is_empty() {
            missing.push("message");
        }
        if !missing.is_empty() {
            return Err(ProxyError::bad_request(format!(
                "Missing required parameters: {}",
                missing.join(" and ")
            )));
        }

        Ok(Self {
            chat_id: chat_id.trim().to_string(),
            message,
        })
    }
}

impl TryFrom<NotificationPayload> for NotificationRequest {
    type Error = ProxyError;

    fn try_from(payload: NotificationPayload) -> Result<Self, Self::Error> {
        let chat_id = payload
            .chat_id
            .map(ChatIdValue::into_string)
            .unwrap_or_default();
        Self::new(chat_id, payload.message.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<NotificationRequest, ProxyError> {
        let payload: NotificationPayload = serde_json::from_str(json).unwrap();
        NotificationRequest::try_from(payload)
    }

    #[test]
    fn test_accepts_string_and_numeric_chat_id() {
        let req = parse(r#"{"chatId": "123456789", "message": "hi"}"#).unwrap();
        assert_eq!(req.chat_id, "123456789");

        let req = parse(r#"{"chatId": -1001234567890, "message": "hi"}"#).unwrap();
        assert_eq!(req.chat_id, "-1001234567890");
    }

    #[test]
    fn test_missing_fields_are_bad_request() {
        let err = parse(r#"{"message": "hi"}"#).unwrap_err();
        assert!(matches!(err, ProxyError::BadRequest(ref m) if m.contains("chatId")));

        let err = parse(r#"{"chatId": "1", "message": "   "}"#).unwrap_err();
        assert!(matches!(err, ProxyError::BadRequest(ref m) if m.contains("message")));

        let err = parse("{}").unwrap_err();
        assert!(matches!(err, ProxyError::BadRequest(ref m) if m.contains("chatId and message")));
    }

    #[test]
    fn test_message_is_forwarded_verbatim() {
        let req = parse(r#"{"chatId": "1", "message": "<b>김프</b> 3.2%\n"}"#).unwrap();
        assert_eq!(req.message, "<b>김프</b> 3.2%\n");
    }
}
