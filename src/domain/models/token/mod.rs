//! 토큰 모델
//!
//! 서명된 액세스 토큰의 클레임과 불투명 리프레시 토큰의 와이어 포맷을 정의합니다.

pub mod refresh_token;
pub mod token;

pub use refresh_token::*;
pub use token::*;
