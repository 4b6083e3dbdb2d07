//! 도메인 모델
//!
//! - [`auth`] - 인증된 사용자, 역할, 인증 모드
//! - [`token`] - 액세스 토큰 클레임, 리프레시 토큰 와이어 포맷
//! - [`session`] - 리프레시 세션과 회전 패밀리

pub mod auth;
pub mod session;
pub mod token;

pub use auth::*;
pub use session::*;
pub use token::*;
