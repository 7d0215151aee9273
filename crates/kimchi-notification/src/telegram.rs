//! 텔레그램 메시지 전달.
//!
//! 호출자가 지정한 채팅으로 메시지를 Telegram Bot API `sendMessage`를 통해 전달합니다.
//! 봇 토큰은 시작 시 주입되며 로그나 응답에 노출되지 않습니다.

use std::time::Duration;

use async_trait::async_trait;
use kimchi_core::NotificationRequest;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::types::{NotificationError, NotificationResult, NotificationSender};

/// 기본 Telegram Bot API URL.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// 텔레그램 전달기 설정.
#[derive(Debug)]
pub struct TelegramConfig {
    /// Bot API 기본 URL
    pub base_url: String,
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: Option<SecretString>,
    /// 파싱 모드 (HTML 또는 MarkdownV2)
    pub parse_mode: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(base_url: impl Into<String>, bot_token: Option<SecretString>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bot_token,
            parse_mode: "HTML".to_string(),
            timeout_secs: 10,
        }
    }

    /// 타임아웃 설정.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Bot API 응답 봉투.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// 텔레그램 메시지 전달기.
pub struct TelegramForwarder {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramForwarder {
    /// 새 전달기를 생성합니다.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `NotificationError::InvalidConfig`를 반환합니다.
    pub fn new(config: TelegramConfig) -> NotificationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                NotificationError::InvalidConfig(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        Ok(Self { config, client })
    }

    async fn send_message(
        &self,
        token: &SecretString,
        request: &NotificationRequest,
    ) -> NotificationResult<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.base_url,
            token.expose_secret()
        );

        let params = serde_json::json!({
            "chat_id": request.chat_id,
            "text": request.message,
            "parse_mode": self.config.parse_mode,
        });

        debug!(chat_id = %request.chat_id, "Sending Telegram message");

        // URL에 토큰이 포함되므로 에러에서 제거
        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;
        let status = response.status();
        // 본문을 읽지 못하면 전달 여부를 알 수 없으므로 거절이 아닌 전송 에러로 처리
        let body = response
            .text()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;
        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();

        if status.as_u16() == 429 {
            let retry_after = parsed
                .as_ref()
                .and_then(|r| r.parameters.as_ref())
                .and_then(|p| p.retry_after)
                .unwrap_or(60);
            warn!(retry_after, "Telegram rate limited");
            return Err(NotificationError::RateLimited(retry_after));
        }

        match parsed {
            Some(reply) if status.is_success() && reply.ok => {
                info!(chat_id = %request.chat_id, "Telegram message sent");
                Ok(())
            }
            reply => {
                let description = reply
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                error!(status = status.as_u16(), %description, "Telegram rejected message");
                Err(NotificationError::Rejected {
                    status: Some(status.as_u16()),
                    description,
                })
            }
        }
    }
}

impl std::fmt::Debug for TelegramForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramForwarder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationSender for TelegramForwarder {
    async fn forward(&self, request: &NotificationRequest) -> NotificationResult<()> {
        let Some(token) = self.config.bot_token.as_ref() else {
            error!("TELEGRAM_BOT_TOKEN is not set");
            return Err(NotificationError::MissingCredential);
        };
        self.send_message(token, request).await
    }

    fn is_configured(&self) -> bool {
        self.config.bot_token.is_some()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
