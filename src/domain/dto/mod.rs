//! 요청/응답 DTO
//!
//! HTTP 계층과 서비스 계층 사이에서 오가는 데이터 구조입니다.
//! 입력 검증은 `validator` derive로 선언합니다.

pub mod tokens;
pub mod users;

pub use tokens::*;
pub use users::*;
