//! 알림 전달 공통 타입.

use async_trait::async_trait;
use kimchi_core::{NotificationRequest, ProxyError};
use thiserror::Error;

/// 알림 전달 결과 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 전달 에러.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 봇 토큰이 설정되지 않음
    #[error("Telegram bot is not configured. Please set TELEGRAM_BOT_TOKEN environment variable.")]
    MissingCredential,

    /// 메신저 API가 요청을 거부
    #[error("Telegram API error: {description}")]
    Rejected {
        status: Option<u16>,
        description: String,
    },

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),
}

impl From<NotificationError> for ProxyError {
    fn from(err: NotificationError) -> Self {
        let message = err.to_string();
        match err {
            NotificationError::MissingCredential | NotificationError::InvalidConfig(_) => {
                ProxyError::Configuration(message)
            }
            NotificationError::Rejected { status, .. } => {
                ProxyError::upstream("Telegram", status, message)
            }
            NotificationError::RateLimited(_) => ProxyError::upstream("Telegram", Some(429), message),
            NotificationError::NetworkError(_) => ProxyError::upstream("Telegram", None, message),
        }
    }
}

/// 알림 전달기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 요청된 채팅으로 메시지를 전달합니다.
    async fn forward(&self, request: &NotificationRequest) -> NotificationResult<()>;

    /// 자격 증명이 설정되어 있는지 확인합니다.
    fn is_configured(&self) -> bool;

    /// 전달기 이름을 반환합니다.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let proxy: ProxyError = NotificationError::MissingCredential.into();
        assert_eq!(proxy.code(), "CONFIGURATION_ERROR");
        assert_eq!(proxy.status_code(), 500);
    }

    #[test]
    fn test_rejection_carries_description() {
        let err = NotificationError::Rejected {
            status: Some(400),
            description: "Bad Request: chat not found".into(),
        };
        assert_eq!(err.to_string(), "Telegram API error: Bad Request: chat not found");

        match ProxyError::from(err) {
            ProxyError::Upstream { service, status, message } => {
                assert_eq!(service, "Telegram");
                assert_eq!(status, Some(400));
                assert!(message.contains("chat not found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
