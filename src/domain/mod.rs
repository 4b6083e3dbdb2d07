//! 도메인 계층
//!
//! 엔티티, 모델, 요청/응답 DTO를 정의합니다.
//! 외부 저장소나 HTTP 프레임워크에 대한 로직은 포함하지 않습니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
