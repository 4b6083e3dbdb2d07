//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client / 다른 백엔드 서비스
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Middlewares - Bearer 토큰 검증, 역할 확인
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - 요청 파싱, 응답 변환
//! ├─────────────────────────────────────────────┤
//!   Services - AuthService
//! ├─────────────────────────────────────────────┤
//!   Repositories / Caching - MongoDB, Redis
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 핸들러는 `web::Data<AuthService>`로 서비스를 받고, 에러는 `AppError`를 그대로 반환합니다.
//!
//! - **`auth`**: 가입, 로그인, 갱신, 로그아웃, 토큰 검증, JWKS
//! - **`users`**: 인증된 사용자 정보, 관리자 전용 엔드포인트

pub mod auth;
pub mod users;
