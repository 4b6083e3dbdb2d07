//! 인메모리 세션 백엔드
//!
//! 단일 프로세스 배포와 테스트를 위한 [`SessionBackend`] 구현입니다.
//! 만료 판단은 주입된 [`Clock`]으로 하므로 `ManualClock`과 함께 쓰면
//! TTL 경계를 결정적으로 재현할 수 있습니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use async_trait::async_trait;
use crate::caching::SessionBackend;
use crate::errors::AppError;
use crate::utils::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: i64,
}

/// `Mutex<HashMap>` 기반 키-값 저장소
pub struct InMemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    unavailable: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            unavailable: AtomicBool::new(false),
        }
    }

    /// 저장소 장애를 흉내냅니다. 켜져 있는 동안 모든 연산이 `StoreUnavailable`로 실패합니다.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 만료되지 않은 키 개수
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("in-memory backend offline".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| AppError::StoreUnavailable("in-memory backend poisoned".to_string()))
    }

    fn live_value(entries: &mut HashMap<String, Entry>, key: &str, now: i64) -> Option<String> {
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// 밀리초 TTL을 초 단위로 올림합니다.
fn ceil_seconds(ttl: Duration) -> i64 {
    let millis = ttl.as_millis() as i64;
    ((millis + 999) / 1000).max(1)
}

#[async_trait]
impl SessionBackend for InMemoryBackend {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let now = self.clock.now();
        let mut entries = self.guard()?;
        Ok(Self::live_value(&mut entries, key, now))
    }

    async fn set_raw_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), AppError> {
        let now = self.clock.now();
        let mut entries = self.guard()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl_seconds.max(1) as i64,
            },
        );
        Ok(())
    }

    async fn try_lock(&self, key: &str, owner: &str, ttl: Duration) -> Result<bool, AppError> {
        let now = self.clock.now();
        let mut entries = self.guard()?;
        if Self::live_value(&mut entries, key, now).is_some() {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: owner.to_string(),
                expires_at: now + ceil_seconds(ttl),
            },
        );
        Ok(true)
    }

    async fn unlock(&self, key: &str, owner: &str) -> Result<bool, AppError> {
        let now = self.clock.now();
        let mut entries = self.guard()?;
        match Self::live_value(&mut entries, key, now) {
            Some(current) if current == owner => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
