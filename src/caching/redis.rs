//! # Redis 세션 백엔드 구현
//!
//! 이 모듈은 Redis를 백엔드로 하는 [`SessionBackend`] 구현을 제공합니다.
//!
//! ## 연결 관리
//!
//! 생성 시 만든 [`ConnectionManager`] 하나를 모든 요청이 복제해 사용합니다.
//! 멀티플렉싱된 단일 연결이며, 끊어지면 자동으로 재연결합니다.
//!
//! ## 분산 잠금
//!
//! | 연산 | Redis 명령 | 원자성 |
//! |------|-----------|--------|
//! | 획득 | `SET key owner NX PX ttl` | 단일 명령 |
//! | 해제 | `GET` 비교 후 `DEL` (Lua) | 스크립트 단위 |
//!
//! 해제 시 소유자를 비교하므로, 잠금 TTL이 지나 다른 요청이 잠금을 가져간 뒤에
//! 늦게 도착한 해제 요청이 남의 잠금을 지우지 않습니다.

use std::time::Duration;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, Script};
use crate::caching::SessionBackend;
use crate::errors::AppError;

/// 소유자가 일치할 때만 키를 삭제하는 Lua 스크립트
const UNLOCK_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Redis 클라이언트 래퍼
#[derive(Clone)]
pub struct RedisClient {
    /// 재연결을 관리하는 공유 연결
    manager: ConnectionManager,
}

impl RedisClient {
    /// 새 Redis 클라이언트 인스턴스를 생성합니다.
    ///
    /// 생성 시 `PING`으로 연결 테스트를 수행하여 서버 가용성을 확인합니다.
    ///
    /// ## 예제
    ///
    /// ```rust,ignore
    /// let redis = RedisClient::new("redis://localhost:6379").await?;
    /// ```
    pub async fn new(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url).map_err(store_error)?;

        let mut manager = ConnectionManager::new(client).await.map_err(store_error)?;
        redis::cmd("PING")
            .query_async::<()>(&mut manager)
            .await
            .map_err(store_error)?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { manager })
    }

    fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[async_trait]
impl SessionBackend for RedisClient {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.connection();
        conn.get(key).await.map_err(store_error)
    }

    async fn set_raw_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), AppError> {
        let mut conn = self.connection();
        let _: () = conn
            .set_ex(key, value, ttl_seconds.max(1))
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn try_lock(&self, key: &str, owner: &str, ttl: Duration) -> Result<bool, AppError> {
        let mut conn = self.connection();
        let ttl_ms = (ttl.as_millis() as u64).max(1);

        // 원자적 잠금 획득을 위해 SET NX PX 사용
        let result: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(owner)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(result.is_some())
    }

    async fn unlock(&self, key: &str, owner: &str) -> Result<bool, AppError> {
        let mut conn = self.connection();
        let deleted: i64 = Script::new(UNLOCK_SCRIPT)
            .key(key)
            .arg(owner)
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(deleted > 0)
    }
}

fn store_error(e: RedisError) -> AppError {
    AppError::StoreUnavailable(format!("redis: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_errors_map_to_store_unavailable() {
        let error = RedisError::from((redis::ErrorKind::IoError, "connection refused"));

        assert!(matches!(store_error(error), AppError::StoreUnavailable(_)));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(Client::open("not a url").is_err());
    }

    #[actix_web::test]
    async fn test_unreachable_server_fails_at_construction() {
        let result = RedisClient::new("redis://127.0.0.1:1/").await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }
}
