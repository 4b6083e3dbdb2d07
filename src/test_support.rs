//! 테스트용 조립 헬퍼
//!
//! 인메모리 저장소와 수동 시계로 [`AuthService`]를 구성합니다.

use std::sync::Arc;
use std::time::Duration;
use crate::caching::memory::InMemoryBackend;
use crate::config::{SessionSettings, TokenSettings};
use crate::domain::dto::users::request::{LoginRequest, SignUpRequest};
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::role::Role;
use crate::domain::models::token::token::TokenPair;
use crate::repositories::users::credential_store::InMemoryCredentialStore;
use crate::services::auth::auth_service::AuthService;
use crate::services::auth::session_store::SessionStore;
use crate::services::auth::token_manager::TokenManager;
use crate::utils::ManualClock;

pub const START: i64 = 1_700_000_000;
pub const PASSWORD: &str = "correct horse battery";

pub struct TestContext {
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryCredentialStore>,
    pub backend: Arc<InMemoryBackend>,
    pub auth: Arc<AuthService>,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let users = Arc::new(InMemoryCredentialStore::new());
        let backend = Arc::new(InMemoryBackend::with_clock(clock.clone()));
        let tokens = Arc::new(TokenManager::hs256(b"test-secret", TokenSettings::default()));
        let sessions = Arc::new(SessionStore::new(backend.clone(), clock.clone(), SessionSettings::default()));
        let auth = AuthService::new(users.clone(), tokens, sessions, clock.clone(), 4, Duration::from_secs(2))
            .expect("auth service");

        Self { clock, users, backend, auth: Arc::new(auth) }
    }

    /// 가입 후 역할을 바꾸고 로그인까지 마친 토큰 쌍을 반환합니다.
    pub async fn login_as(&self, email: &str, role: Role) -> (User, TokenPair) {
        let user = self
            .auth
            .sign_up(SignUpRequest { email: email.to_string(), password: PASSWORD.to_string() })
            .await
            .expect("sign up");
        self.users.set_role(&user.id, role);

        let pair = self
            .auth
            .login(LoginRequest { email: email.to_string(), password: PASSWORD.to_string() })
            .await
            .expect("login");

        (user.with_role(role), pair)
    }
}
