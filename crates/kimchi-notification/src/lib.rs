//! # Kimchi Notification
//!
//! 호출자가 지정한 텔레그램 채팅으로 메시지를 전달합니다.

pub mod telegram;
pub mod types;

pub use telegram::*;
pub use types::*;
