//! 세션 저장소 백엔드 모듈
//!
//! 리프레시 세션 상태는 TTL과 원자적 잠금 기본 연산을 제공하는 키-값 저장소에 보관됩니다.
//! [`SessionBackend`] trait이 그 좁은 인터페이스이며, 두 가지 구현을 제공합니다.
//!
//! - [`redis::RedisClient`] - 운영용 Redis 백엔드 (`SET NX PX` 잠금, Lua compare-and-delete 해제)
//! - [`memory::InMemoryBackend`] - 테스트 및 단일 프로세스용 인메모리 백엔드
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::{SessionBackend, redis::RedisClient};
//!
//! let backend = RedisClient::new(&StoreConfig::redis_url()).await?;
//! if backend.try_lock("refresh:lock:abc", "owner-1", Duration::from_secs(5)).await? {
//!     // 임계 구역
//!     backend.unlock("refresh:lock:abc", "owner-1").await?;
//! }
//! ```

use std::time::Duration;
use async_trait::async_trait;
use crate::errors::AppError;

pub mod memory;
pub mod redis;

/// 세션 상태 저장소가 제공해야 하는 최소 연산
///
/// 모든 값은 JSON 문자열로 저장됩니다.
/// 인프라 오류는 모두 `AppError::StoreUnavailable`로 보고합니다.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// 키의 값을 조회합니다. 없거나 만료되었으면 `None`입니다.
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError>;

    /// 키에 값을 저장하고 `ttl_seconds` 뒤에 만료되도록 합니다.
    async fn set_raw_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), AppError>;

    /// 키가 비어 있을 때만 `owner` 값으로 잠금을 설정합니다.
    ///
    /// 잠금은 `ttl` 후 자동으로 만료되므로, 해제되지 않은 채 취소된 요청도
    /// 잠금을 영구히 점유하지 못합니다.
    async fn try_lock(&self, key: &str, owner: &str, ttl: Duration) -> Result<bool, AppError>;

    /// `owner`가 현재 잠금 소유자일 때만 잠금을 해제합니다.
    async fn unlock(&self, key: &str, owner: &str) -> Result<bool, AppError>;
}
