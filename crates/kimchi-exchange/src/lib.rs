//! # Kimchi Exchange
//!
//! 거래소 공개 시세 커넥터와 USD/KRW 환율 계산기.
//!
//! ## 지원 거래소
//!
//! - Upbit (`/v1/ticker`)
//! - Binance (`/api/v3/ticker/price`)
//! - Bithumb (`/public/ticker/{symbol}`)

pub mod connector;
pub mod error;
pub mod rate;
pub mod traits;

pub use connector::{BinanceClient, BithumbClient, ConnectorConfig, UpbitClient};
pub use error::{ExchangeError, ExchangeResult};
pub use rate::{ExchangeRateDeriver, MarketLeg};
pub use traits::TickerSource;
