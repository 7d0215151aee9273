//! 시세 조회 trait 정의.

use async_trait::async_trait;
use kimchi_core::TickerSnapshot;

use crate::error::ExchangeResult;

/// 단일 심볼의 현재 시세를 제공하는 업스트림.
///
/// 구현체는 업스트림 응답을 검증하여, 유효한 가격이 있는 경우에만
/// [`TickerSnapshot`]을 반환해야 합니다.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// 거래소 이름 반환 (예: "Upbit").
    fn name(&self) -> &str;

    /// 심볼의 현재 시세 조회.
    async fn get_ticker(&self, symbol: &str) -> ExchangeResult<TickerSnapshot>;
}
