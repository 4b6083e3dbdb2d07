//! User Entity Implementation
//!
//! 자격 증명 저장소가 소유하는 사용자 엔티티입니다.
//! 가입 시 생성되고, 로그인과 토큰 발급 시 조회됩니다.
//! 물리적으로 삭제되지 않으며 `is_active` 플래그로만 비활성화됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::models::auth::role::Role;

/// 사용자 엔티티
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 사용자 고유 ID (UUID v4 문자열)
    #[serde(rename = "_id")]
    pub id: String,
    /// 사용자 이메일 (unique, 소문자 정규화)
    pub email: String,
    /// bcrypt 해시된 비밀번호
    pub password_hash: String,
    /// 사용자 역할
    pub role: Role,
    /// 계정 활성화 여부 (soft-disable)
    pub is_active: bool,
    /// 생성 시간
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 새 로컬 사용자 생성
    ///
    /// 기본 역할은 [`Role::Buyer`]이며 활성 상태로 시작합니다.
    pub fn new_local(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            role: Role::default(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// 로그인 및 토큰 발급이 가능한 사용자인지 확인
    pub fn can_authenticate(&self) -> bool {
        self.is_active && !self.password_hash.is_empty()
    }
}

/// 이메일을 저장/조회용 형태로 정규화합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
