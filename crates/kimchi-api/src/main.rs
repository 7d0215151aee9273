//! 김치스프레드 프록시 API 서버.
//!
//! 설정을 로드하고 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use kimchi_api::metrics::setup_metrics_recorder;
use kimchi_api::server::{create_router, shutdown_signal};
use kimchi_api::state::AppState;
use kimchi_core::{init_logging, telegram_bot_token_from_env, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("Starting Kimchi Spread API server...");

    let metrics_handle = setup_metrics_recorder().context("Prometheus 레코더 설치 실패")?;
    info!("Prometheus metrics recorder initialized");

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    let bot_token = telegram_bot_token_from_env();
    if bot_token.is_none() {
        warn!("TELEGRAM_BOT_TOKEN not set, /api/telegram will return a configuration error");
    }

    let state = Arc::new(AppState::from_config(&config, bot_token)?);
    info!(
        version = %state.version,
        telegram_configured = state.telegram_configured(),
        upbit = %config.upstream.upbit_base_url,
        binance = %config.upstream.binance_base_url,
        bithumb = %config.upstream.bithumb_base_url,
        "Application state initialized"
    );

    let app = create_router(
        state,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("{} 바인딩 실패", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}
