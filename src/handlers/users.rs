//! 인증된 사용자 핸들러
//!
//! 인증 미들웨어가 주입한 [`AuthenticatedUser`]만 사용하며 저장소에 접근하지 않습니다.
use actix_web::{get, HttpResponse};
use serde_json::json;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;

/// 현재 사용자 정보
///
/// # Endpoint
/// `GET /api/v1/me` (모든 역할)
#[get("")]
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user)
}

/// 관리자 전용 확인 엔드포인트
///
/// # Endpoint
/// `GET /api/v1/admin/ping`
#[get("/ping")]
pub async fn admin_ping(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "pong": true,
        "user_id": user.user_id
    }))
}
