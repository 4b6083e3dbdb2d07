//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 전역 레지스트리 없이 생성자 주입으로 조립됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AuthService, SessionStore, TokenManager};
//!
//! let tokens = Arc::new(TokenManager::from_env()?);
//! let sessions = Arc::new(SessionStore::new(backend, clock.clone(), SessionSettings::from_env()));
//! let auth = AuthService::new(users, tokens, sessions, clock, PasswordConfig::bcrypt_cost(), StoreConfig::store_timeout())?;
//! ```

pub mod auth;
