//! AuthMiddleware 인증 로직의 핵심적인 기능
//!
//! 요청마다 다음 상태를 거칩니다.
//!
//! ```text
//! NoToken ──(Bearer 헤더)──▶ TokenPresent ──(verify)──▶ Verified ──(역할 확인)──▶ Authorized
//!    │                           │                        │
//!    └──── 401 ──────────────────┴──── 401 ───────────────┴──── 403 ──▶ Rejected
//! ```
//!
//! `Authorized`에서만 Request Extensions에 [`AuthenticatedUser`]가 주입됩니다.
use std::rc::Rc;
use std::sync::Arc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::auth::authentication_request::{AuthMode, RequiredRole};
use crate::errors::AppError;
use crate::services::auth::auth_service::AuthService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub auth: Arc<AuthService>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

/// 요청이 거절되는 이유
#[derive(Debug, PartialEq)]
pub(crate) enum Rejection {
    /// `Authorization: Bearer <token>` 헤더가 없거나 형식이 틀림
    MissingHeader,
    /// 토큰 검증 실패 (원인은 로그에만 남김)
    InvalidToken(AppError),
    /// 토큰은 유효하지만 역할이 허용 집합에 없음
    InsufficientRole,
}

impl Rejection {
    fn into_response(self) -> HttpResponse {
        match self {
            Rejection::MissingHeader => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "missing_auth_header",
                "message": "missing/invalid auth header"
            })),
            Rejection::InvalidToken(_) => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_token",
                "message": "invalid token"
            })),
            Rejection::InsufficientRole => HttpResponse::Forbidden().json(serde_json::json!({
                "error": AppError::InsufficientRole.kind(),
                "message": "insufficient role"
            })),
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let auth = self.auth.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let outcome = authenticate(&req, &auth, required_role.as_ref());

            match (&mode, outcome) {
                (_, Ok(user)) => {
                    log::debug!("인증 성공: 사용자 ID {} ({})", user.user_id, user.role);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Required, Err(rejection)) => {
                    match &rejection {
                        Rejection::MissingHeader => log::debug!("인증 실패: Authorization 헤더 없음 - {}", req.path()),
                        Rejection::InvalidToken(e) => log::warn!("인증 실패: {} - {}", e.kind(), req.path()),
                        Rejection::InsufficientRole => log::warn!("권한 부족: {}", req.path()),
                    }
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, rejection.into_response())
                        .map_into_right_body();
                    return Ok(res);
                }
                // 선택적 인증은 실패해도 익명으로 진행
                (AuthMode::Optional, Err(rejection)) => {
                    log::debug!("선택적 인증: 익명으로 진행 ({:?})", rejection);
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청 하나에 대해 상태 머신을 끝까지 실행합니다.
pub(crate) fn authenticate(
    req: &ServiceRequest,
    auth: &AuthService,
    required_role: Option<&RequiredRole>,
) -> Result<AuthenticatedUser, Rejection> {
    // NoToken -> TokenPresent
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(Rejection::MissingHeader)?;
    let token = bearer_token(header).ok_or(Rejection::MissingHeader)?;

    // TokenPresent -> Verified
    let claims = auth.verify_access_token(token).map_err(Rejection::InvalidToken)?;

    // Verified -> Authorized
    if let Some(required) = required_role {
        if !required.is_satisfied(claims.role) {
            return Err(Rejection::InsufficientRole);
        }
    }

    Ok(AuthenticatedUser::from(claims))
}

/// `Bearer <token>` 형식에서 토큰 부분을 추출합니다. 스킴은 대소문자를 구분하지 않습니다.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
