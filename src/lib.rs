//! 인증 수명주기 엔진
//!
//! 자격 증명과 토큰의 수명주기를 관리하는 인증 서비스입니다.
//! 가입과 로그인, 짧은 수명의 액세스 토큰 발급, 재사용 탐지가 포함된
//! 리프레시 토큰 회전, 그리고 요청 인증 미들웨어를 제공합니다.
//!
//! # Features
//!
//! - **자격 증명**: 이메일 정규화, bcrypt 비밀번호 해싱, 계정 열거 방지
//! - **액세스 토큰**: HS256/RS256 서명 JWT, 시계 오차 허용, JWKS 공개
//! - **리프레시 세션**: 패밀리 단위 회전, 재사용 시 패밀리 전체 폐기
//! - **동시성**: 패밀리별 분산 잠금으로 동시 회전 직렬화
//! - **MongoDB**: 사용자 자격 증명 저장
//! - **Redis**: 세션 패밀리, 세션, 잠금 저장
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   AuthService   │ ← TokenManager + SessionStore
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CredentialStore │ ← SessionBackend
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! let auth = AuthService::new(users, tokens, sessions, clock, 12, Duration::from_secs(2))?;
//!
//! let user = auth.sign_up(request).await?;
//! let pair = auth.login(login_request).await?;
//! let rotated = auth.refresh(&pair.refresh_token).await?;
//! ```

pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;

#[cfg(test)]
mod test_support;
