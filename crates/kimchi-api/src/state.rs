//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 요청 간에 공유되는 가변 상태는 없습니다. 업스트림 클라이언트와
//! 설정 값만 `Arc`로 공유합니다.

use std::sync::Arc;

use anyhow::Context;
use kimchi_core::AppConfig;
use kimchi_exchange::{
    BinanceClient, BithumbClient, ConnectorConfig, ExchangeRateDeriver, MarketLeg, TickerSource,
    UpbitClient,
};
use kimchi_notification::{NotificationSender, TelegramConfig, TelegramForwarder};
use secrecy::SecretString;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// Upbit 시세 소스
    pub upbit: Arc<dyn TickerSource>,

    /// Binance 시세 소스
    pub binance: Arc<dyn TickerSource>,

    /// Bithumb 시세 소스
    pub bithumb: Arc<dyn TickerSource>,

    /// USD/KRW 환율 계산기
    pub deriver: ExchangeRateDeriver,

    /// 텔레그램 메시지 전달기
    pub notifier: Arc<dyn NotificationSender>,

    /// 실시간 계산 실패 시 사용하는 환율
    pub fallback_krw: f64,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// 애플리케이션 버전
    pub version: String,
}

impl AppState {
    /// 설정과 봇 토큰으로 상태를 생성합니다.
    ///
    /// 토큰이 없어도 생성은 성공하며, `/api/telegram`만 설정 에러를 반환합니다.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 에러를 반환합니다.
    pub fn from_config(config: &AppConfig, bot_token: Option<SecretString>) -> anyhow::Result<Self> {
        let upstream = &config.upstream;
        let connector = |base_url: &str| {
            ConnectorConfig::new(base_url).with_timeout_secs(upstream.timeout_secs)
        };

        let upbit: Arc<dyn TickerSource> = Arc::new(
            UpbitClient::new(connector(&upstream.upbit_base_url))
                .context("Upbit 클라이언트 생성 실패")?,
        );
        let binance: Arc<dyn TickerSource> = Arc::new(
            BinanceClient::new(connector(&upstream.binance_base_url))
                .context("Binance 클라이언트 생성 실패")?,
        );
        let bithumb: Arc<dyn TickerSource> = Arc::new(
            BithumbClient::new(connector(&upstream.bithumb_base_url))
                .context("Bithumb 클라이언트 생성 실패")?,
        );

        let rate = &config.exchange_rate;
        let deriver = ExchangeRateDeriver::new(
            MarketLeg::new(upbit.clone(), rate.krw_market.clone()),
            MarketLeg::new(upbit.clone(), rate.usdt_market.clone()),
        );

        let notifier: Arc<dyn NotificationSender> = Arc::new(
            TelegramForwarder::new(
                TelegramConfig::new(upstream.telegram_base_url.clone(), bot_token)
                    .with_timeout_secs(upstream.timeout_secs),
            )
            .context("Telegram 전달기 생성 실패")?,
        );

        Ok(Self {
            upbit,
            binance,
            bithumb,
            deriver,
            notifier,
            fallback_krw: rate.fallback_krw,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 서버 업타임(초)을 반환합니다.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 텔레그램 전달이 가능한지 확인합니다.
    pub fn telegram_configured(&self) -> bool {
        self.notifier.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_without_token() {
        let state = AppState::from_config(&AppConfig::default(), None).unwrap();

        assert!(!state.telegram_configured());
        assert_eq!(state.fallback_krw, 1300.0);
        assert_eq!(state.deriver.source_label(), "Upbit (BTC/KRW ÷ BTC/USDT)");
        assert!(state.uptime_secs() >= 0);
    }
}
