//! 토큰 관련 DTO

pub mod request;

pub use request::*;
