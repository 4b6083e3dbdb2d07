//! 리프레시 세션 및 회전 패밀리
//!
//! 하나의 로그인에서 시작된 리프레시 토큰 세대들의 체인을 "패밀리"라 부릅니다.
//! 세대는 포인터 체인이 아니라 `(family_id, generation)`으로 색인되는 레코드 집합으로
//! 저장되며, 패밀리 레코드가 현재 유효한 세대 번호 하나만을 가리킵니다.
//!
//! ```text
//! refresh:family:{family_id}            → SessionFamily { current_generation: 2, .. }
//! refresh:session:{family_id}:0         → RefreshSession { revoked: true, .. }
//! refresh:session:{family_id}:1         → RefreshSession { revoked: true, .. }
//! refresh:session:{family_id}:2         → RefreshSession { revoked: false, .. }  ← current
//! refresh:lock:{family_id}              → 갱신 중에만 존재하는 잠금
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 패밀리가 폐기된 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    /// 사용자가 로그아웃함
    Logout,
    /// 이미 교체된 세대가 다시 제시됨
    ReplayDetected,
    /// 사용자가 비활성화되었거나 삭제됨
    UserDisabled,
}

/// 회전 패밀리 헤더 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFamily {
    pub family_id: String,
    pub user_id: String,
    /// 다음 갱신에 유효한 유일한 세대
    pub current_generation: u64,
    pub created_at: i64,
    /// 현재 세대의 만료 시각 (Unix timestamp)
    pub expires_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<RevocationReason>,
}

impl SessionFamily {
    pub fn is_revoked(&self) -> bool {
        self.revoked.is_some()
    }

    pub fn is_active(&self, now: i64) -> bool {
        !self.is_revoked() && now < self.expires_at
    }
}

/// 리프레시 토큰 한 세대의 세션 레코드
///
/// 비밀값 원문은 저장하지 않고 SHA-256 해시만 보관합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub session_id: String,
    pub user_id: String,
    pub family_id: String,
    pub generation: u64,
    pub secret_hash: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub revoked: bool,
}

impl RefreshSession {
    pub fn new(
        user_id: String,
        family_id: String,
        generation: u64,
        secret_hash: String,
        issued_at: i64,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id,
            family_id,
            generation,
            secret_hash,
            issued_at,
            expires_at: issued_at + ttl_seconds,
            revoked: false,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_boundary() {
        let session = RefreshSession::new(
            "user".to_string(),
            "family".to_string(),
            0,
            "hash".to_string(),
            1_000,
            60,
        );

        assert_eq!(session.expires_at, 1_060);
        assert!(!session.is_expired(1_059));
        assert!(session.is_expired(1_060));
    }

    #[test]
    fn test_family_activity() {
        let mut family = SessionFamily {
            family_id: "family".to_string(),
            user_id: "user".to_string(),
            current_generation: 0,
            created_at: 1_000,
            expires_at: 2_000,
            revoked: None,
        };

        assert!(family.is_active(1_500));
        assert!(!family.is_active(2_000));

        family.revoked = Some(RevocationReason::Logout);
        assert!(!family.is_active(1_500));
    }
}
