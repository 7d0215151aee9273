//! BTC 삼각 환산으로 얻은 USD/KRW 환율.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ticker::TickerQuote;
use crate::error::QuoteError;

/// 실시간 계산이 실패했을 때 사용하는 고정 환율 (KRW per USD).
pub const FALLBACK_KRW_RATE: f64 = 1300.0;

/// 기준 통화 (1로 고정).
pub const BASE_CURRENCY: &str = "USD";

/// 호가 통화.
pub const QUOTE_CURRENCY: &str = "KRW";

/// 두 BTC 시세로부터 계산한 USD/KRW 환율.
///
/// `rate == krw_quote.price / usdt_quote.price` 가 항상 성립하며,
/// 두 입력 시세가 모두 유효할 때만 생성됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateResult {
    /// 기준 통화 ("USD")
    pub base_currency: String,
    /// 호가 통화 ("KRW")
    pub quote_currency: String,
    /// 1 USD 당 KRW
    pub rate: f64,
    /// 계산 시각
    pub computed_at: DateTime<Utc>,
    /// BTC/KRW 시세
    pub krw_quote: TickerQuote,
    /// BTC/USDT 시세
    pub usdt_quote: TickerQuote,
}

impl ExchangeRateResult {
    /// 두 시세로 환율을 계산합니다.
    ///
    /// 소수점 반올림은 하지 않습니다. 표시용 반올림은 [`Self::calculation`]에서만 합니다.
    ///
    /// # Errors
    /// 몫이 유한한 양수가 아니면 `QuoteError::InvalidRate`를 반환합니다.
    pub fn from_quotes(
        krw_quote: TickerQuote,
        usdt_quote: TickerQuote,
    ) -> Result<Self, QuoteError> {
        let rate = krw_quote.price / usdt_quote.price;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(QuoteError::InvalidRate(rate));
        }

        Ok(Self {
            base_currency: BASE_CURRENCY.to_string(),
            quote_currency: QUOTE_CURRENCY.to_string(),
            rate,
            computed_at: Utc::now(),
            krw_quote,
            usdt_quote,
        })
    }

    /// 관측용 계산식 문자열 (예: "140000000 ÷ 100000 = 1400.00").
    pub fn calculation(&self) -> String {
        format!(
            "{} ÷ {} = {:.2}",
            self.krw_quote.price, self.usdt_quote.price, self.rate
        )
    }
}
