//! 도메인 엔티티
//!
//! 영구 저장소에 저장되는 엔티티를 정의합니다.

pub mod users;

pub use users::*;
