//! 에러 모듈
//!
//! 인증 엔진의 모든 실패 조건을 표현하는 [`AppError`]를 제공합니다.

pub mod errors;

pub use errors::{AppError, AppResult, ErrorContext};
