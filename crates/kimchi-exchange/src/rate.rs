//! USD/KRW 환율 계산기.
//!
//! 같은 자산(BTC)의 KRW 가격과 USDT 가격을 동시에 조회하여
//! `KRW 가격 ÷ USDT 가격`으로 환율을 유도합니다. USDT는 1 USD로 간주합니다.

use std::sync::Arc;

use futures::future::join;
use kimchi_core::ExchangeRateResult;
use tracing::{debug, info, warn};

use crate::error::ExchangeResult;
use crate::traits::TickerSource;

/// 환율 계산의 한쪽 다리: 시세 소스와 조회할 마켓.
#[derive(Clone)]
pub struct MarketLeg {
    /// 시세 소스
    pub source: Arc<dyn TickerSource>,
    /// 마켓 식별자 (예: "KRW-BTC")
    pub market: String,
}

impl MarketLeg {
    /// 새 다리 생성.
    pub fn new(source: Arc<dyn TickerSource>, market: impl Into<String>) -> Self {
        Self {
            source,
            market: market.into(),
        }
    }
}

impl std::fmt::Debug for MarketLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketLeg")
            .field("source", &self.source.name())
            .field("market", &self.market)
            .finish()
    }
}

/// BTC 삼각 환산 환율 계산기.
#[derive(Debug, Clone)]
pub struct ExchangeRateDeriver {
    krw_leg: MarketLeg,
    usdt_leg: MarketLeg,
}

impl ExchangeRateDeriver {
    /// 새 계산기 생성.
    pub fn new(krw_leg: MarketLeg, usdt_leg: MarketLeg) -> Self {
        Self { krw_leg, usdt_leg }
    }

    /// 응답 `source` 필드용 설명 (예: "Upbit (BTC/KRW ÷ BTC/USDT)").
    pub fn source_label(&self) -> String {
        let krw = self.krw_leg.source.name();
        let usdt = self.usdt_leg.source.name();
        if krw == usdt {
            format!("{} (BTC/KRW ÷ BTC/USDT)", krw)
        } else {
            format!("{} BTC/KRW ÷ {} BTC/USDT", krw, usdt)
        }
    }

    /// 두 시세를 동시에 조회하여 환율을 계산합니다.
    ///
    /// 두 요청은 모두 완료될 때까지 기다립니다. 하나라도 실패하면 에러를 반환하며,
    /// 둘 다 실패한 경우 KRW 쪽 에러를 보고합니다.
    pub async fn derive(&self) -> ExchangeResult<ExchangeRateResult> {
        let (krw, usdt) = join(
            self.krw_leg.source.get_ticker(&self.krw_leg.market),
            self.usdt_leg.source.get_ticker(&self.usdt_leg.market),
        )
        .await;

        let (krw, usdt) = match (krw, usdt) {
            (Ok(krw), Ok(usdt)) => (krw, usdt),
            (Err(e), other) => {
                if let Err(usdt_err) = other {
                    debug!(error = %usdt_err, "USDT leg also failed");
                }
                warn!(market = %self.krw_leg.market, error = %e, "KRW leg failed");
                return Err(e);
            }
            (Ok(_), Err(e)) => {
                warn!(market = %self.usdt_leg.market, error = %e, "USDT leg failed");
                return Err(e);
            }
        };

        let result = ExchangeRateResult::from_quotes(krw.quote, usdt.quote)?;
        info!(
            rate = result.rate,
            calculation = %result.calculation(),
            "USD/KRW rate derived"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExchangeError;
    use async_trait::async_trait;
    use kimchi_core::{TickerQuote, TickerSnapshot};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 마켓별 고정 가격을 돌려주는 테스트용 소스.
    struct FixedSource {
        prices: HashMap<String, f64>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(prices: &[(&str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                prices: prices.iter().map(|(m, p)| (m.to_string(), *p)).collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TickerSource for FixedSource {
        fn name(&self) -> &str {
            "Upbit"
        }

        async fn get_ticker(&self, symbol: &str) -> ExchangeResult<TickerSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.prices.get(symbol) {
                Some(price) => {
                    let quote = TickerQuote::new(symbol, *price, None)?;
                    Ok(TickerSnapshot::new(quote, serde_json::json!({ "trade_price": price })))
                }
                None => Err(ExchangeError::SymbolNotFound {
                    exchange: "Upbit".into(),
                    symbol: symbol.into(),
                }),
            }
        }
    }

    fn deriver(source: Arc<FixedSource>) -> ExchangeRateDeriver {
        ExchangeRateDeriver::new(
            MarketLeg::new(source.clone(), "KRW-BTC"),
            MarketLeg::new(source, "USDT-BTC"),
        )
    }

    #[tokio::test]
    async fn test_derive_rate() {
        let source = FixedSource::new(&[("KRW-BTC", 140_000_000.0), ("USDT-BTC", 100_000.0)]);
        let result = deriver(source.clone()).derive().await.unwrap();

        assert_eq!(result.rate, 1400.0);
        assert_eq!(result.calculation(), "140000000 ÷ 100000 = 1400.00");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_leg_still_awaits_other() {
        let source = FixedSource::new(&[("KRW-BTC", 140_000_000.0)]);
        let err = deriver(source.clone()).derive().await.unwrap_err();

        assert!(matches!(err, ExchangeError::SymbolNotFound { ref symbol, .. } if symbol == "USDT-BTC"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_both_legs_fail_reports_krw() {
        let source = FixedSource::new(&[]);
        let err = deriver(source).derive().await.unwrap_err();
        assert!(matches!(err, ExchangeError::SymbolNotFound { ref symbol, .. } if symbol == "KRW-BTC"));
    }

    #[test]
    fn test_source_label() {
        let source = FixedSource::new(&[]);
        assert_eq!(deriver(source).source_label(), "Upbit (BTC/KRW ÷ BTC/USDT)");
    }
}
