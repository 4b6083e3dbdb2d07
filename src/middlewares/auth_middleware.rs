//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 액세스 토큰을 검증하고 사용자 정보를 주입합니다.
//! 라우트는 허용 역할 집합을 선언하고, 미들웨어는 집합 포함 여부만 검사합니다.
//!
//! ```rust,ignore
//! web::scope("/api/v1/admin")
//!     .wrap(AuthMiddleware::required(auth.clone()).with_roles(&[Role::Admin]))
//!     .route("/ping", web::get().to(admin_ping))
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::models::auth::authentication_request::{AuthMode, RequiredRole};
use crate::domain::models::auth::role::{Role, RoleSet};
use crate::middlewares::auth_inner::AuthMiddlewareService;
use crate::services::auth::auth_service::AuthService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    auth: Arc<AuthService>,
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(auth: Arc<AuthService>, mode: AuthMode) -> Self {
        Self {
            auth,
            mode,
            required_role: None,
        }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required(auth: Arc<AuthService>) -> Self {
        Self::new(auth, AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional(auth: Arc<AuthService>) -> Self {
        Self::new(auth, AuthMode::Optional)
    }

    /// 허용 역할 집합 지정
    pub fn with_roles(mut self, roles: &[Role]) -> Self {
        self.required_role = Some(RequiredRole::new(RoleSet::of(roles)));
        self
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            auth: self.auth.clone(),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use crate::domain::models::auth::authenticated_user::{AuthenticatedUser, OptionalUser};
    use crate::test_support::TestContext;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(user)
    }

    async fn maybe(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "authenticated": user.0.is_some() }))
    }

    fn app(
        auth: Arc<AuthService>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl actix_web::body::MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new()
            .service(
                web::scope("/me")
                    .wrap(AuthMiddleware::required(auth.clone()))
                    .route("", web::get().to(whoami)),
            )
            .service(
                web::scope("/admin")
                    .wrap(AuthMiddleware::required(auth.clone()).with_roles(&[Role::Admin]))
                    .route("", web::get().to(whoami)),
            )
            .service(
                web::scope("/public")
                    .wrap(AuthMiddleware::optional(auth))
                    .route("", web::get().to(maybe)),
            )
    }

    #[actix_web::test]
    async fn test_login_token_round_trip_injects_identity() {
        let ctx = TestContext::new();
        let (user, pair) = ctx.login_as("alice@example.com", Role::Seller).await;
        let app = test::init_service(app(ctx.auth.clone())).await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let identity: AuthenticatedUser = test::call_and_read_body_json(&app, req).await;

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.role, Role::Seller);
    }

    #[actix_web::test]
    async fn test_missing_or_garbage_token_is_401() {
        let ctx = TestContext::new();
        let app = test::init_service(app(ctx.auth.clone())).await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "invalid token");
    }

    #[actix_web::test]
    async fn test_expired_token_is_401() {
        let ctx = TestContext::new();
        let (_, pair) = ctx.login_as("alice@example.com", Role::Buyer).await;
        ctx.clock.advance(900 + 30);
        let app = test::init_service(app(ctx.auth.clone())).await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_buyer_on_admin_route_is_403() {
        let ctx = TestContext::new();
        let (_, buyer) = ctx.login_as("buyer@example.com", Role::Buyer).await;
        let (_, admin) = ctx.login_as("admin@example.com", Role::Admin).await;
        let app = test::init_service(app(ctx.auth.clone())).await;

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", buyer.access_token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", admin.access_token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_optional_mode_allows_anonymous() {
        let ctx = TestContext::new();
        let (_, pair) = ctx.login_as("alice@example.com", Role::Buyer).await;
        let app = test::init_service(app(ctx.auth.clone())).await;

        let req = test::TestRequest::get().uri("/public").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["authenticated"], false);

        let req = test::TestRequest::get()
            .uri("/public")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["authenticated"], true);
    }
}
