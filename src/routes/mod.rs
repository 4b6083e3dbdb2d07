//! API 라우트 설정 모듈
//!
//! 인증 엔드포인트, 보호된 사용자 엔드포인트, 헬스체크와 JWKS를 등록합니다.
//! 인증 미들웨어가 `AuthService`를 필요로 하므로 설정 함수는 서비스 핸들을 받습니다.
//!
//! # Route Groups
//!
//! | 경로 | 인증 |
//! |------|------|
//! | `POST /api/v1/auth/{signup,login,refresh,logout,verify}` | 불필요 |
//! | `GET /api/v1/me` | 필수, 모든 역할 |
//! | `GET /api/v1/admin/ping` | 필수, `admin` |
//! | `GET /health`, `GET /.well-known/jwks.json` | 불필요 |
//!
//! # Examples
//!
//! ```rust,ignore
//! let auth = Arc::new(auth_service);
//! App::new()
//!     .app_data(web::Data::from(auth.clone()))
//!     .configure(configure_all_routes(auth.clone()))
//! ```

use std::sync::Arc;
use actix_web::{get, web, HttpResponse};
use serde_json::json;
use crate::domain::models::auth::role::Role;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::auth_service::AuthService;

/// 모든 라우트를 설정하는 클로저를 반환합니다
///
/// `App::configure`에 그대로 넘길 수 있습니다.
pub fn configure_all_routes(auth: Arc<AuthService>) -> impl Fn(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(health_check);
        cfg.service(handlers::auth::jwks);

        configure_auth_routes(cfg);
        configure_user_routes(cfg, auth.clone());
    }
}

/// 인증 관련 라우트를 설정합니다
///
/// 토큰을 얻기 위한 엔드포인트이므로 모두 공개입니다.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"password123"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::sign_up)
            .service(handlers::auth::login)
            .service(handlers::auth::refresh)
            .service(handlers::auth::logout)
            .service(handlers::auth::verify_token)
    );
}

/// 보호된 사용자 라우트를 설정합니다
fn configure_user_routes(cfg: &mut web::ServiceConfig, auth: Arc<AuthService>) {
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::required(auth.clone()))
            .service(handlers::users::me)
    );

    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(AuthMiddleware::required(auth).with_roles(&[Role::Admin]))
            .service(handlers::users::admin_ping)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "auth_lifecycle",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use crate::test_support::{TestContext, PASSWORD};

    macro_rules! init_app {
        ($ctx:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from($ctx.auth.clone()))
                    .configure(configure_all_routes($ctx.auth.clone())),
            )
            .await
        };
    }

    fn credentials(email: &str) -> Value {
        json!({ "email": email, "password": PASSWORD })
    }

    #[actix_web::test]
    async fn test_health_check() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "auth_lifecycle");
    }

    #[actix_web::test]
    async fn test_signup_then_duplicate_is_409() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(credentials("New@Example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["email"], "new@example.com");
        assert_eq!(body["role"], "buyer");
        assert!(body.get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(credentials("new@example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_signup_rejects_short_password() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({ "email": "a@example.com", "password": "short" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_failures_are_indistinguishable() {
        let ctx = TestContext::new();
        ctx.login_as("alice@example.com", Role::Buyer).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "alice@example.com", "password": "wrong password" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let wrong_password: Value = test::read_body_json(res).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(credentials("nobody@example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let unknown_email: Value = test::read_body_json(res).await;

        assert_eq!(wrong_password, unknown_email);
    }

    #[actix_web::test]
    async fn test_full_lifecycle_over_http() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(credentials("carol@example.com"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(credentials("carol@example.com"))
            .to_request();
        let pair: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pair["token_type"], "Bearer");
        assert_eq!(pair["expires_in"], 900);

        let req = test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header(("Authorization", format!("Bearer {}", pair["access_token"].as_str().unwrap())))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["email"], "carol@example.com");

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": pair["refresh_token"] }))
            .to_request();
        let rotated: Value = test::call_and_read_body_json(&app, req).await;
        assert_ne!(rotated["refresh_token"], pair["refresh_token"]);

        // 회전된 토큰 재사용
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": pair["refresh_token"] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        // 재사용 탐지 후 패밀리 전체가 폐기됨
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": rotated["refresh_token"] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_logout_revokes_refresh_token() {
        let ctx = TestContext::new();
        let (_, pair) = ctx.login_as("dave@example.com", Role::Buyer).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .set_json(json!({ "refresh_token": pair.refresh_token }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": pair.refresh_token }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_verify_endpoint() {
        let ctx = TestContext::new();
        let (user, pair) = ctx.login_as("erin@example.com", Role::Seller).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/verify")
            .set_json(json!({ "token": pair.access_token }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["claims"]["sub"], user.id);
        assert_eq!(body["claims"]["role"], "seller");

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/verify")
            .set_json(json!({ "token": "not-a-jwt" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_admin_route_requires_admin_role() {
        let ctx = TestContext::new();
        let (_, buyer) = ctx.login_as("buyer@example.com", Role::Buyer).await;
        let (admin_user, admin) = ctx.login_as("root@example.com", Role::Admin).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/ping")
            .insert_header(("Authorization", format!("Bearer {}", buyer.access_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/ping")
            .insert_header(("Authorization", format!("Bearer {}", admin.access_token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pong"], true);
        assert_eq!(body["user_id"], admin_user.id);
    }

    #[actix_web::test]
    async fn test_store_outage_is_503_with_retry_after() {
        let ctx = TestContext::new();
        let (_, pair) = ctx.login_as("frank@example.com", Role::Buyer).await;
        ctx.backend.set_unavailable(true);
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": pair.refresh_token }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(res.headers().get("Retry-After").unwrap(), "1");
    }

    #[actix_web::test]
    async fn test_jwks_for_hs256_is_empty() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::get().uri("/.well-known/jwks.json").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["keys"], json!([]));
    }
}
