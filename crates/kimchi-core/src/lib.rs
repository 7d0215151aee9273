//! # Kimchi Core
//!
//! 시세 프록시 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 시세 및 환율 값 타입
//! - 알림 요청 타입
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
