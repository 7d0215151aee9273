//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → 환경 변수 순서로 덮어씁니다.
//!
//! # 환경 변수
//!
//! - `KIMCHI__<SECTION>__<KEY>`: 모든 설정 키 (예: `KIMCHI__SERVER__PORT=8080`)
//! - `KIMCHI_CONFIG`: 설정 파일 경로 (기본값: `config/default.toml`)
//! - `API_HOST`, `API_PORT`: 서버 바인딩 주소 (기존 배포 호환)
//! - `TELEGRAM_BOT_TOKEN`: 텔레그램 봇 토큰

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::domain::FALLBACK_KRW_RATE;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 봇 토큰 환경 변수 이름.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 업스트림 API 설정
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 환율 계산 설정
    #[serde(default)]
    pub exchange_rate: ExchangeRateConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 전체 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 업스트림 API 설정.
///
/// 테스트에서는 기본 URL을 로컬 mock 서버로 바꿉니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Upbit REST API 기본 URL
    pub upbit_base_url: String,
    /// Binance REST API 기본 URL
    pub binance_base_url: String,
    /// Bithumb REST API 기본 URL
    pub bithumb_base_url: String,
    /// Telegram Bot API 기본 URL
    pub telegram_base_url: String,
    /// 업스트림 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            upbit_base_url: "https://api.upbit.com".to_string(),
            binance_base_url: "https://api.binance.com".to_string(),
            bithumb_base_url: "https://api.bithumb.com".to_string(),
            telegram_base_url: "https://api.telegram.org".to_string(),
            timeout_secs: 10,
        }
    }
}

/// 환율 계산 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExchangeRateConfig {
    /// BTC/KRW 마켓 (Upbit)
    pub krw_market: String,
    /// BTC/USDT 마켓 (Upbit)
    pub usdt_market: String,
    /// 계산 실패 시 반환할 환율
    pub fallback_krw: f64,
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        Self {
            krw_market: "KRW-BTC".to_string(),
            usdt_market: "USDT-BTC".to_string(),
            fallback_krw: FALLBACK_KRW_RATE,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "kimchi_api=info,tower_http=debug".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "server.request_timeout_secs",
                defaults.server.request_timeout_secs as i64,
            )?
            .set_default("upstream.upbit_base_url", defaults.upstream.upbit_base_url)?
            .set_default("upstream.binance_base_url", defaults.upstream.binance_base_url)?
            .set_default("upstream.bithumb_base_url", defaults.upstream.bithumb_base_url)?
            .set_default("upstream.telegram_base_url", defaults.upstream.telegram_base_url)?
            .set_default("upstream.timeout_secs", defaults.upstream.timeout_secs as i64)?
            .set_default("exchange_rate.krw_market", defaults.exchange_rate.krw_market)?
            .set_default("exchange_rate.usdt_market", defaults.exchange_rate.usdt_market)?
            .set_default("exchange_rate.fallback_krw", defaults.exchange_rate.fallback_krw)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("KIMCHI")
                    .separator("__")
                    .try_parsing(true),
            )
            // 기존 배포 환경 변수 호환
            .set_override_option("server.host", std::env::var("API_HOST").ok())?
            .set_override_option(
                "server.port",
                std::env::var("API_PORT")
                    .ok()
                    .and_then(|p| p.parse::<i64>().ok()),
            )?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// `KIMCHI_CONFIG` 또는 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var("KIMCHI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }
}

/// 환경에서 텔레그램 봇 토큰을 읽습니다.
///
/// 프로세스 시작 시 한 번만 호출하여 알림 전달기에 주입합니다.
/// 비어 있는 값은 미설정으로 취급합니다.
pub fn telegram_bot_token_from_env() -> Option<SecretString> {
    std::env::var(TELEGRAM_TOKEN_ENV)
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .map(|token| SecretString::new(token.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_real_upstreams() {
        let config = AppConfig::default();
        assert_eq!(config.upstream.upbit_base_url, "https://api.upbit.com");
        assert_eq!(config.exchange_rate.krw_market, "KRW-BTC");
        assert_eq!(config.exchange_rate.usdt_market, "USDT-BTC");
        assert_eq!(config.exchange_rate.fallback_krw, 1300.0);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.exchange_rate, ExchangeRateConfig::default());
        assert_eq!(config.upstream.timeout_secs, 10);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().port(), 3000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
