//! # Configuration Module
//!
//! 인증 엔진의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리하며,
//! 서비스에는 생성 시점에 값으로 주입됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 데이터베이스, Redis, 서버, 환경, 비밀번호 해싱 설정
//! - [`auth_config`] - 액세스 토큰, 리프레시 세션, 잠금 설정
//!
//! ## 설계 원칙
//!
//! - 민감한 정보(JWT 비밀키, 개인키 경로)는 환경 변수로만 제공
//! - 기본값은 개발 환경에서만 안전
//! - 필수 설정값 누락은 프로세스 시작 시점에 실패

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
