//! # 인증 서비스
//!
//! 자격 증명 저장소, 토큰 매니저, 세션 저장소를 조합하여
//! 가입, 로그인, 토큰 갱신, 로그아웃, 액세스 토큰 검증을 제공합니다.
//!
//! ## 흐름
//!
//! ```text
//! sign_up  ─ CredentialStore.insert
//! login    ─ CredentialStore.find_by_email ─ bcrypt ─ SessionStore.create_session ─ TokenManager.issue
//! refresh  ─ RefreshToken.parse ─ CredentialStore.find_by_id ─ SessionStore.rotate ─ TokenManager.issue
//! logout   ─ RefreshToken.parse ─ SessionStore.revoke_family
//! verify   ─ TokenManager.verify (저장소 접근 없음)
//! ```
//!
//! 모든 협력 객체는 생성자로 주입됩니다.
//!
//! ```rust,ignore
//! let service = AuthService::new(users, tokens, sessions, Arc::new(SystemClock), bcrypt_cost, store_timeout)?;
//! let pair = service.login(LoginRequest { email, password }).await?;
//! let claims = service.verify_access_token(&pair.access_token)?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use actix_web::web;
use crate::domain::dto::users::request::{LoginRequest, SignUpRequest};
use crate::domain::entities::users::user::{normalize_email, User};
use crate::domain::models::session::refresh_session::RevocationReason;
use crate::domain::models::token::refresh_token::{constant_time_eq, RefreshToken};
use crate::domain::models::token::token::{AccessTokenClaims, TokenPair};
use crate::errors::{AppError, AppResult, ErrorContext};
use crate::repositories::users::credential_store::CredentialStore;
use crate::services::auth::session_store::SessionStore;
use crate::services::auth::token_manager::TokenManager;
use crate::utils::{with_deadline, Clock};
use validator::Validate;

/// 존재하지 않는 이메일에도 같은 비용의 bcrypt 검증을 수행하기 위한 값
const DUMMY_PASSWORD: &str = "auth-lifecycle-dummy-password";

/// 인증 서비스
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    tokens: Arc<TokenManager>,
    sessions: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    bcrypt_cost: u32,
    store_timeout: Duration,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        tokens: Arc<TokenManager>,
        sessions: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
        bcrypt_cost: u32,
        store_timeout: Duration,
    ) -> AppResult<Self> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, bcrypt_cost).context("더미 해시 생성 실패")?;

        Ok(Self {
            users,
            tokens,
            sessions,
            clock,
            bcrypt_cost,
            store_timeout,
            dummy_hash,
        })
    }

    /// 회원가입
    ///
    /// 토큰은 발급하지 않습니다. 가입 후 별도로 로그인해야 합니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 이메일 형식 또는 비밀번호 길이 위반
    /// * `EmailTaken` - 같은 이메일이 이미 존재
    pub async fn sign_up(&self, mut request: SignUpRequest) -> AppResult<User> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        if self.guarded("find_by_email", self.users.find_by_email(&request.email)).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let started = std::time::Instant::now();
        let password_hash = self.hash_password(request.password).await?;
        log::debug!("비밀번호 해싱 소요 시간: {:?}", started.elapsed());

        let user = User::new_local(request.email, password_hash);
        self.guarded("insert", self.users.insert(user.clone())).await?;

        log::info!("회원가입 완료 - user_id: {}", user.id);
        Ok(user)
    }

    /// 로그인
    ///
    /// 존재하지 않는 이메일과 틀린 비밀번호는 구분할 수 없는 같은 에러로 실패합니다.
    pub async fn login(&self, mut request: LoginRequest) -> AppResult<TokenPair> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let user = self.guarded("find_by_email", self.users.find_by_email(&request.email)).await?;

        let user = match user {
            Some(user) => {
                let valid = self.verify_password(request.password, user.password_hash.clone()).await?;
                if !valid || !user.can_authenticate() {
                    log::info!("로그인 실패 - user_id: {}", user.id);
                    return Err(AppError::InvalidCredentials);
                }
                user
            }
            None => {
                // 사용자 열거 방지: 실패 경로의 소요 시간을 맞춤
                let _ = self.verify_password(request.password, self.dummy_hash.clone()).await?;
                return Err(AppError::InvalidCredentials);
            }
        };

        let (_, refresh_token) = self.sessions.create_session(&user.id).await?;
        let pair = self.token_pair(&user, &refresh_token)?;

        log::info!("로그인 성공 - user_id: {}, family_id: {}", user.id, refresh_token.family_id);
        Ok(pair)
    }

    /// 리프레시 토큰 회전
    ///
    /// 새 액세스 토큰의 역할은 세션이 아니라 현재 사용자 레코드에서 다시 읽습니다.
    ///
    /// # Errors
    ///
    /// * `TokenMalformed` - 토큰 형식 또는 비밀값 불일치
    /// * `ReplayDetected` - 이미 교체된 토큰 재사용 (패밀리 전체 폐기)
    /// * `SessionExpired` - 만료되었거나 로그아웃된 패밀리
    /// * `RefreshInProgress` - 같은 패밀리의 갱신이 진행 중 (재시도 가능)
    /// * `InvalidCredentials` - 사용자가 비활성화되었거나 사라짐
    pub async fn refresh(&self, presented: &str) -> AppResult<TokenPair> {
        let token = RefreshToken::parse(presented)?;

        // 회전 전에 사용자를 읽어 둠. 조회가 실패하면 세션은 그대로라 같은 토큰으로 재시도할 수 있음
        let user = match self.sessions.find_family(&token.family_id).await? {
            Some(family) => self.guarded("find_by_id", self.users.find_by_id(&family.user_id)).await?,
            None => None,
        };

        let (session, next_token) = self
            .sessions
            .rotate(&token.family_id, token.generation, &token.secret_hash())
            .await
            .inspect_err(|e| {
                if e.is_security_event() {
                    log::warn!("🚨 security_event={} family_id: {}", e.kind(), token.family_id);
                }
            })?;

        let Some(user) = user.filter(|user| user.is_active && user.id == session.user_id) else {
            log::warn!(
                "비활성 사용자의 토큰 갱신 - user_id: {}, family_id: {}",
                session.user_id,
                session.family_id
            );
            self.sessions
                .revoke_family(&session.family_id, RevocationReason::UserDisabled)
                .await?;
            return Err(AppError::InvalidCredentials);
        };

        self.token_pair(&user, &next_token)
    }

    /// 로그아웃
    ///
    /// 패밀리 전체를 폐기합니다. 이미 로그아웃된 토큰으로 다시 호출해도 성공합니다.
    pub async fn logout(&self, presented: &str) -> AppResult<()> {
        let token = RefreshToken::parse(presented)?;

        // 패밀리 ID만 아는 제3자가 세션을 끊지 못하도록 비밀값을 확인
        if let Some(session) = self.sessions.find_session(&token.family_id, token.generation).await? {
            if !constant_time_eq(&session.secret_hash, &token.secret_hash()) {
                return Err(AppError::TokenMalformed);
            }
        }

        self.sessions
            .revoke_family(&token.family_id, RevocationReason::Logout)
            .await?;

        log::info!("로그아웃 - family_id: {}", token.family_id);
        Ok(())
    }

    /// 액세스 토큰 검증
    ///
    /// 세션 저장소에 접근하지 않는 무상태 경로입니다.
    pub fn verify_access_token(&self, token: &str) -> AppResult<AccessTokenClaims> {
        self.tokens.verify(token, self.clock.now())
    }

    /// 패밀리가 아직 살아 있는지 확인합니다. (전체 로그아웃 확인 등 상태가 필요한 경로용)
    pub async fn is_session_active(&self, presented: &str) -> AppResult<bool> {
        let token = RefreshToken::parse(presented)?;
        self.sessions.is_family_active(&token.family_id).await
    }

    pub fn jwks(&self) -> serde_json::Value {
        self.tokens.jwks()
    }

    fn token_pair(&self, user: &User, refresh_token: &RefreshToken) -> AppResult<TokenPair> {
        let claims = self.tokens.claims_for(user, self.clock.now());
        let access_token = self.tokens.issue(&claims)?;

        Ok(TokenPair::bearer(
            access_token,
            refresh_token.encode(),
            self.tokens.access_ttl_seconds(),
        ))
    }

    async fn hash_password(&self, password: String) -> AppResult<String> {
        let cost = self.bcrypt_cost;
        web::block(move || bcrypt::hash(password, cost))
            .await
            .context("비밀번호 해싱 작업 실패")?
            .context("비밀번호 해싱 실패")
    }

    async fn verify_password(&self, password: String, password_hash: String) -> AppResult<bool> {
        if password_hash.is_empty() {
            return Ok(false);
        }
        web::block(move || bcrypt::verify(password, &password_hash))
            .await
            .context("비밀번호 검증 작업 실패")?
            .context("비밀번호 검증 실패")
    }

    async fn guarded<T>(&self, operation: &str, fut: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        with_deadline(self.store_timeout, operation, fut).await
    }
}
