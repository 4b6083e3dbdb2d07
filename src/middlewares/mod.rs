//! 미들웨어 모듈
//!
//! ActixWeb 애플리케이션의 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 액세스 토큰 추출 및 무상태 검증
//! - 사용자 정보를 request extension에 저장
//! - 라우트별 허용 역할 집합 검사
//! - 선택적/강제 인증 모드 지원
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new()
//!     .service(
//!         web::scope("/api/v1/me")
//!             .wrap(AuthMiddleware::required(auth.clone())) // 보호된 라우트에만 강제 인증
//!             .route("", web::get().to(me))
//!     )
//!     .service(
//!         web::scope("/api/v1/admin")
//!             .wrap(AuthMiddleware::required(auth.clone()).with_roles(&[Role::Admin]))
//!             .route("/ping", web::get().to(admin_ping))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
