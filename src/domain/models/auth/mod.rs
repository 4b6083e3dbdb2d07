//! 인증 관련 모델
//!
//! 요청 컨텍스트에 주입되는 사용자 정보, 인증 모드, 역할 집합을 정의합니다.

pub mod authenticated_user;
pub mod authentication_request;
pub mod role;

pub use authenticated_user::*;
pub use authentication_request::*;
pub use role::*;
