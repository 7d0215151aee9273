//! API 설명 문서 (`GET /`).

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::health::SERVICE_NAME;
use crate::state::AppState;

/// 엔드포인트 목록과 설정 안내를 반환합니다.
pub async fn api_docs(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": state.version,
        "endpoints": {
            "/api/upbit": {
                "method": "GET",
                "params": { "symbol": "KRW-BTC" },
                "description": "Upbit 가격 조회"
            },
            "/api/binance": {
                "method": "GET",
                "params": { "symbol": "BTCUSDT" },
                "description": "Binance 가격 조회"
            },
            "/api/bithumb": {
                "method": "GET",
                "params": { "symbol": "BTC_KRW" },
                "description": "Bithumb 가격 조회"
            },
            "/api/exchange-rate": {
                "method": "GET",
                "description": "USD/KRW 환율 (Upbit BTC/KRW ÷ BTC/USDT)"
            },
            "/api/telegram": {
                "method": "POST",
                "body": { "chatId": "string", "message": "string" },
                "description": "텔레그램 알림 전송"
            },
            "/health": {
                "method": "GET",
                "description": "서버 상태 확인"
            },
            "/metrics": {
                "method": "GET",
                "description": "Prometheus 메트릭"
            }
        },
        "setup": {
            "telegram": "Set TELEGRAM_BOT_TOKEN environment variable",
            "telegramConfigured": state.telegram_configured(),
            "cors": "Enabled for all origins"
        }
    }))
}
