//! # 리프레시 세션 저장소
//!
//! 리프레시 토큰 회전 체인(패밀리)을 기록하고, 재사용(replay)을 감지하는 유일한 상태 보유 컴포넌트입니다.
//!
//! ## 키 레이아웃
//!
//! ```text
//! refresh:family:{family_id}                  SessionFamily (현재 세대, 폐기 사유)
//! refresh:session:{family_id}:{generation}    RefreshSession (비밀값 해시)
//! refresh:lock:{family_id}                    갱신 잠금 (소유자 ID, TTL)
//! ```
//!
//! ## 잠금 규칙
//!
//! 패밀리 상태를 읽고 바꾸는 모든 연산(`rotate`, `revoke_family`)은 패밀리 단위
//! 배타 잠금 안에서 실행됩니다. 잠금은 TTL로 자동 만료되므로 요청이 취소되어도
//! TTL 이상 남지 않습니다. 잠금을 얻지 못하면 `RefreshInProgress`(재시도 가능)입니다.
//!
//! 회전은 쓰기 직전에 잠금을 여전히 보유하는지, 남은 잠금 시간이 쓰기 두 번의
//! 데드라인보다 긴지 다시 확인합니다. 어느 쪽이든 실패하면 아무것도 쓰지 않고
//! `RefreshInProgress`로 끝납니다.
//!
//! ## 회전 판정
//!
//! | 상황 | 결과 |
//! |------|------|
//! | 패밀리 없음, 로그아웃/비활성화로 폐기됨 | `SessionExpired` |
//! | 재사용 감지로 폐기됨 | `ReplayDetected` |
//! | 비밀값 해시 불일치, 발급된 적 없는 세대 | `TokenMalformed` (패밀리 유지) |
//! | 이미 교체된 세대 제시 | 패밀리 전체 폐기 + `ReplayDetected` |
//! | 현재 세대가 만료됨 | `SessionExpired` |
//! | 현재 세대 | 현재 세대 폐기, `generation + 1` 발급 |

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use crate::caching::SessionBackend;
use crate::config::SessionSettings;
use crate::domain::models::session::refresh_session::{RefreshSession, RevocationReason, SessionFamily};
use crate::domain::models::token::refresh_token::{constant_time_eq, new_family_id, RefreshToken};
use crate::errors::{AppError, AppResult, ErrorContext};
use crate::utils::{with_deadline, Clock};

/// 잠금 대기 중 재시도 간격
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

pub fn family_key(family_id: &str) -> String {
    format!("refresh:family:{}", family_id)
}

pub fn session_key(family_id: &str, generation: u64) -> String {
    format!("refresh:session:{}:{}", family_id, generation)
}

pub fn lock_key(family_id: &str) -> String {
    format!("refresh:lock:{}", family_id)
}

/// 리프레시 세션 저장소
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>, clock: Arc<dyn Clock>, settings: SessionSettings) -> Self {
        Self { backend, clock, settings }
    }

    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.settings.refresh_ttl_seconds
    }

    /// 새 패밀리를 만들고 0세대 세션과 리프레시 토큰을 반환합니다.
    ///
    /// 비밀값 원문은 반환되는 토큰에만 있고 저장소에는 해시만 기록됩니다.
    pub async fn create_session(&self, user_id: &str) -> AppResult<(RefreshSession, RefreshToken)> {
        let now = self.clock.now();
        let token = RefreshToken::generate(new_family_id(), 0);
        let session = RefreshSession::new(
            user_id.to_string(),
            token.family_id.clone(),
            0,
            token.secret_hash(),
            now,
            self.settings.refresh_ttl_seconds,
        );
        let family = SessionFamily {
            family_id: token.family_id.clone(),
            user_id: user_id.to_string(),
            current_generation: 0,
            created_at: now,
            expires_at: session.expires_at,
            revoked: None,
        };

        self.put_session(&session, now).await?;
        self.put_family(&family, now).await?;

        log::info!("리프레시 세션 생성 - user_id: {}, family_id: {}", user_id, family.family_id);
        Ok((session, token))
    }

    /// 제시된 세대를 검증하고 다음 세대로 회전합니다.
    ///
    /// `presented_secret_hash`는 클라이언트가 제시한 비밀값의 SHA-256 해시입니다.
    pub async fn rotate(
        &self,
        family_id: &str,
        presented_generation: u64,
        presented_secret_hash: &str,
    ) -> AppResult<(RefreshSession, RefreshToken)> {
        let owner = Uuid::new_v4().to_string();
        self.acquire_lock(family_id, &owner, self.settings.lock_wait).await?;
        let acquired_at_ms = self.clock.now_millis();

        let result = self
            .rotate_locked(family_id, presented_generation, presented_secret_hash, &owner, acquired_at_ms)
            .await;

        self.release_lock(family_id, &owner).await;
        result
    }

    async fn rotate_locked(
        &self,
        family_id: &str,
        presented_generation: u64,
        presented_secret_hash: &str,
        owner: &str,
        acquired_at_ms: i64,
    ) -> AppResult<(RefreshSession, RefreshToken)> {
        let now = self.clock.now();

        let Some(mut family) = self.load_family(family_id).await? else {
            return Err(AppError::SessionExpired);
        };

        match family.revoked {
            Some(RevocationReason::ReplayDetected) => return Err(AppError::ReplayDetected),
            Some(_) => return Err(AppError::SessionExpired),
            None => {}
        }

        let Some(mut current) = self.load_session(family_id, presented_generation).await? else {
            if presented_generation < family.current_generation {
                // 교체된 세대의 기록이 이미 만료되어 사라진 경우
                self.revoke_locked(&mut family, RevocationReason::ReplayDetected, now).await?;
                log_replay(&family, presented_generation);
                return Err(AppError::ReplayDetected);
            }
            return Err(AppError::TokenMalformed);
        };

        if !constant_time_eq(&current.secret_hash, presented_secret_hash) {
            log::warn!(
                "리프레시 토큰 비밀값 불일치 - family_id: {}, generation: {}",
                family_id,
                presented_generation
            );
            return Err(AppError::TokenMalformed);
        }

        if current.revoked || presented_generation != family.current_generation {
            self.revoke_locked(&mut family, RevocationReason::ReplayDetected, now).await?;
            log_replay(&family, presented_generation);
            return Err(AppError::ReplayDetected);
        }

        if current.is_expired(now) {
            return Err(AppError::SessionExpired);
        }

        let next_generation = presented_generation + 1;
        let token = RefreshToken::generate(family.family_id.clone(), next_generation);
        let next = RefreshSession::new(
            family.user_id.clone(),
            family.family_id.clone(),
            next_generation,
            token.secret_hash(),
            now,
            self.settings.refresh_ttl_seconds,
        );

        self.ensure_lock_held(family_id, owner, acquired_at_ms).await?;

        // 새 세대를 먼저 기록해야 패밀리 포인터가 없는 세대를 가리키지 않음
        self.put_session(&next, now).await?;

        // 패밀리 기록이 커밋 지점
        family.current_generation = next_generation;
        family.expires_at = next.expires_at;
        self.put_family(&family, now).await?;

        // 이전 세대는 세대 비교만으로도 거부되므로 표시 실패는 결과에 반영하지 않음
        current.revoked = true;
        if let Err(e) = self.put_session(&current, now).await {
            log::warn!(
                "이전 세대 폐기 표시 실패 - family_id: {}, generation: {}, error: {}",
                family_id,
                presented_generation,
                e
            );
        }

        log::debug!(
            "리프레시 세션 회전 - family_id: {}, generation: {} -> {}",
            family_id,
            presented_generation,
            next_generation
        );
        Ok((next, token))
    }

    /// 패밀리의 모든 세대를 폐기합니다. 이미 폐기되었거나 없는 패밀리도 성공입니다.
    ///
    /// 진행 중인 회전이 끝날 때까지 최대 잠금 TTL만큼 기다립니다.
    pub async fn revoke_family(&self, family_id: &str, reason: RevocationReason) -> AppResult<()> {
        let owner = Uuid::new_v4().to_string();
        self.acquire_lock(family_id, &owner, self.settings.lock_ttl).await?;

        let result = async {
            let now = self.clock.now();
            match self.load_family(family_id).await? {
                Some(mut family) => self.revoke_locked(&mut family, reason, now).await,
                None => Ok(()),
            }
        }
        .await;

        self.release_lock(family_id, &owner).await;
        result
    }

    async fn revoke_locked(&self, family: &mut SessionFamily, reason: RevocationReason, now: i64) -> AppResult<()> {
        if family.is_revoked() {
            return Ok(());
        }

        family.revoked = Some(reason);
        self.put_family(family, now).await?;

        for generation in 0..=family.current_generation {
            if let Some(mut session) = self.load_session(&family.family_id, generation).await? {
                if !session.revoked {
                    session.revoked = true;
                    self.put_session(&session, now).await?;
                }
            }
        }

        log::info!(
            "리프레시 패밀리 폐기 - family_id: {}, user_id: {}, reason: {:?}",
            family.family_id,
            family.user_id,
            reason
        );
        Ok(())
    }

    /// 패밀리가 폐기되지 않았고 현재 세대가 만료되지 않았는지 확인합니다.
    pub async fn is_family_active(&self, family_id: &str) -> AppResult<bool> {
        let now = self.clock.now();
        Ok(self
            .load_family(family_id)
            .await?
            .map(|family| family.is_active(now))
            .unwrap_or(false))
    }

    pub async fn find_family(&self, family_id: &str) -> AppResult<Option<SessionFamily>> {
        self.load_family(family_id).await
    }

    pub async fn find_session(&self, family_id: &str, generation: u64) -> AppResult<Option<RefreshSession>> {
        self.load_session(family_id, generation).await
    }

    async fn acquire_lock(&self, family_id: &str, owner: &str, wait: Duration) -> AppResult<()> {
        let key = lock_key(family_id);
        let started = Instant::now();

        loop {
            let acquired = self
                .guarded("try_lock", self.backend.try_lock(&key, owner, self.settings.lock_ttl))
                .await?;
            if acquired {
                return Ok(());
            }
            if started.elapsed() >= wait {
                log::debug!("리프레시 잠금 점유 중 - family_id: {}", family_id);
                return Err(AppError::RefreshInProgress);
            }
            actix_web::rt::time::sleep(LOCK_POLL_INTERVAL).await;
        }
    }

    /// 잠금을 여전히 보유하고, 남은 시간 안에 커밋 쓰기 두 번을 마칠 수 있는지 확인합니다.
    async fn ensure_lock_held(&self, family_id: &str, owner: &str, acquired_at_ms: i64) -> AppResult<()> {
        let held_for = Duration::from_millis((self.clock.now_millis() - acquired_at_ms).max(0) as u64);
        let commit_budget = self.settings.store_timeout * 2;
        let current_owner = self
            .guarded("get", self.backend.get_raw(&lock_key(family_id)))
            .await?;

        if current_owner.as_deref() != Some(owner) || held_for + commit_budget >= self.settings.lock_ttl {
            log::warn!(
                "리프레시 잠금 시간 부족으로 회전 중단 - family_id: {}, held_for: {:?}",
                family_id,
                held_for
            );
            return Err(AppError::RefreshInProgress);
        }
        Ok(())
    }

    /// 잠금 해제 실패는 TTL 만료에 맡기고 결과에 반영하지 않습니다.
    async fn release_lock(&self, family_id: &str, owner: &str) {
        let key = lock_key(family_id);
        match self.guarded("unlock", self.backend.unlock(&key, owner)).await {
            Ok(true) => {}
            Ok(false) => log::warn!("리프레시 잠금이 해제 전에 만료됨 - family_id: {}", family_id),
            Err(e) => log::warn!("리프레시 잠금 해제 실패 - family_id: {}, error: {}", family_id, e),
        }
    }

    async fn load_family(&self, family_id: &str) -> AppResult<Option<SessionFamily>> {
        self.get_json(&family_key(family_id)).await
    }

    async fn load_session(&self, family_id: &str, generation: u64) -> AppResult<Option<RefreshSession>> {
        self.get_json(&session_key(family_id, generation)).await
    }

    async fn put_family(&self, family: &SessionFamily, now: i64) -> AppResult<()> {
        self.set_json(&family_key(&family.family_id), family, family.expires_at - now).await
    }

    async fn put_session(&self, session: &RefreshSession, now: i64) -> AppResult<()> {
        let key = session_key(&session.family_id, session.generation);
        self.set_json(&key, session, session.expires_at - now).await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.guarded("get", self.backend.get_raw(key)).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .with_context(|| format!("세션 레코드 역직렬화 실패 '{}'", key)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: i64) -> AppResult<()> {
        let raw = serde_json::to_string(value).context("세션 레코드 직렬화 실패")?;
        self.guarded("set", self.backend.set_raw_with_expiry(key, &raw, ttl_seconds.max(1) as u64))
            .await
    }

    async fn guarded<T>(&self, operation: &str, fut: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        with_deadline(self.settings.store_timeout, operation, fut).await
    }
}

fn log_replay(family: &SessionFamily, presented_generation: u64) {
    log::warn!(
        "🚨 security_event=refresh_replay family_id: {}, user_id: {}, presented_generation: {}, current_generation: {}",
        family.family_id,
        family.user_id,
        presented_generation,
        family.current_generation
    );
}
