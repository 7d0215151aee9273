//! 요청 단위로 생성되고 버려지는 도메인 값 타입.

pub mod exchange_rate;
pub mod notification;
pub mod ticker;

pub use exchange_rate::*;
pub use notification::*;
pub use ticker::*;
