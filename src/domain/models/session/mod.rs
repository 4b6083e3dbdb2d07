//! 리프레시 세션 모델

pub mod refresh_session;

pub use refresh_session::*;
