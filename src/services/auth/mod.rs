//! 인증 서비스 모듈
//!
//! 액세스 토큰과 리프레시 세션의 생명주기를 담당합니다.
//!
//! - [`TokenManager`](token_manager::TokenManager) - 액세스 토큰 발급/검증 (무상태)
//! - [`SessionStore`](session_store::SessionStore) - 리프레시 토큰 회전 및 재사용 감지 (상태 보유)
//! - [`AuthService`](auth_service::AuthService) - 가입, 로그인, 갱신, 로그아웃 오케스트레이션
//!
//! # Security
//!
//! - HS256 공유 비밀키 또는 RS256 키 쌍 서명 (JWKS 공개)
//! - 리프레시 비밀값은 SHA-256 해시로만 저장
//! - 교체된 리프레시 토큰 재사용 시 패밀리 전체 폐기

pub mod auth_service;
pub mod session_store;
pub mod token_manager;

pub use auth_service::*;
pub use session_store::*;
pub use token_manager::*;
