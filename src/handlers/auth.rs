//! Authentication HTTP Handlers
//!
//! 인증 서비스의 다섯 가지 연산을 HTTP 엔드포인트로 노출합니다.
//! 도메인 에러는 `AppError`의 `ResponseError` 구현이 상태 코드로 변환합니다.
//!
//! | Endpoint | 연산 | 성공 |
//! |----------|------|------|
//! | `POST /auth/signup` | 회원가입 | 201 |
//! | `POST /auth/login` | 로그인 | 200 토큰 쌍 |
//! | `POST /auth/refresh` | 리프레시 토큰 회전 | 200 토큰 쌍 |
//! | `POST /auth/logout` | 패밀리 폐기 | 204 |
//! | `POST /auth/verify` | 액세스 토큰 검증 | 200 클레임 |
use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::domain::dto::tokens::request::{LogoutRequest, RefreshRequest, VerifyTokenRequest};
use crate::domain::dto::users::request::{LoginRequest, SignUpRequest};
use crate::domain::dto::users::response::UserResponse;
use crate::errors::AppError;
use crate::services::auth::auth_service::AuthService;

/// 회원가입 핸들러
///
/// 토큰은 발급하지 않으며, 클라이언트는 이어서 로그인해야 합니다.
#[post("/signup")]
pub async fn sign_up(
    auth: web::Data<AuthService>,
    payload: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AppError> {
    let user = auth.sign_up(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// 로컬 로그인 핸들러
///
/// # Endpoint
/// `POST /auth/login`
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let token_pair = auth.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(token_pair))
}

/// 토큰 갱신 핸들러
///
/// 성공할 때마다 새 리프레시 토큰이 발급되며, 이전 토큰은 다시 사용할 수 없습니다.
#[post("/refresh")]
pub async fn refresh(
    auth: web::Data<AuthService>,
    payload: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let token_pair = auth.refresh(&payload.refresh_token).await?;

    Ok(HttpResponse::Ok().json(token_pair))
}

#[post("/logout")]
pub async fn logout(
    auth: web::Data<AuthService>,
    payload: web::Json<LogoutRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    auth.logout(&payload.refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 액세스 토큰 검증 핸들러
///
/// 다른 서비스가 공개키 없이 토큰을 확인할 때 사용합니다.
#[post("/verify")]
pub async fn verify_token(
    auth: web::Data<AuthService>,
    payload: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let claims = auth.verify_access_token(&payload.token)?;

    Ok(HttpResponse::Ok().json(json!({
        "valid": true,
        "claims": claims
    })))
}

/// JWKS 핸들러
///
/// # Endpoint
/// `GET /.well-known/jwks.json`
#[get("/.well-known/jwks.json")]
pub async fn jwks(auth: web::Data<AuthService>) -> HttpResponse {
    HttpResponse::Ok().json(auth.jwks())
}
