//! # 자격 증명 저장소 인터페이스
//!
//! 인증 코어가 사용자 신원과 비밀번호 해시를 읽고 쓰는 좁은 인터페이스입니다.
//! 운영 환경은 [`UserRepository`](super::user_repo::UserRepository)(MongoDB),
//! 테스트와 단일 프로세스 실행은 [`InMemoryCredentialStore`]를 주입합니다.

use std::collections::HashMap;
use std::sync::RwLock;
use async_trait::async_trait;
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::role::Role;
use crate::errors::AppError;

/// 사용자 자격 증명 저장소
///
/// 이메일은 호출자가 정규화(trim + lowercase)한 값으로 전달합니다.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// 새 사용자를 저장합니다. 같은 이메일이 이미 있으면 `EmailTaken`입니다.
    async fn insert(&self, user: User) -> Result<(), AppError>;
}

/// `RwLock<HashMap>` 기반 자격 증명 저장소
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자를 활성/비활성화합니다. 사용자가 없으면 `false`를 반환합니다.
    pub fn set_active(&self, id: &str, active: bool) -> bool {
        self.update(id, |user| user.is_active = active)
    }

    /// 관리 경로에서의 역할 변경
    pub fn set_role(&self, id: &str, role: Role) -> bool {
        self.update(id, |user| user.role = role)
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut User)) -> bool {
        match self.users.write() {
            Ok(mut users) => match users.get_mut(id) {
                Some(user) => {
                    apply(user);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn poisoned() -> AppError {
        AppError::StoreUnavailable("credential store poisoned".to_string())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.get(id).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), AppError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        // 조회와 삽입이 같은 쓰기 잠금 안에서 일어나야 동시 가입이 안전함
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::EmailTaken);
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }
}
