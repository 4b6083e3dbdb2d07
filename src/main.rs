//! 인증 수명주기 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 생성자 주입으로 조립합니다.
//! MongoDB에 자격 증명을, Redis에 리프레시 세션을 저장합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use auth_lifecycle::caching::redis::RedisClient;
use auth_lifecycle::config::{PasswordConfig, ServerConfig, SessionSettings, StoreConfig};
use auth_lifecycle::db::Database;
use auth_lifecycle::errors::AppError;
use auth_lifecycle::repositories::users::user_repo::UserRepository;
use auth_lifecycle::routes::configure_all_routes;
use auth_lifecycle::services::auth::auth_service::AuthService;
use auth_lifecycle::services::auth::session_store::SessionStore;
use auth_lifecycle::services::auth::token_manager::TokenManager;
use auth_lifecycle::utils::SystemClock;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 인증 수명주기 서비스 시작중...");

    let auth = match build_auth_service().await {
        Ok(auth) => Arc::new(auth),
        Err(e) => {
            error!("서비스 초기화 실패: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(auth).await
}

/// 저장소를 연결하고 [`AuthService`]를 조립합니다
///
/// 필수 설정값이 없거나 저장소에 연결할 수 없으면 시작 단계에서 실패합니다.
async fn build_auth_service() -> Result<AuthService, AppError> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new(&StoreConfig::mongodb_uri(), &StoreConfig::database_name()).await?;
    let users = Arc::new(UserRepository::new(&database).await?);

    info!("✅ MongoDB 연결 성공");

    let redis_client = Arc::new(RedisClient::new(&StoreConfig::redis_url()).await?);

    info!("✅ Redis 연결 성공");

    let clock = Arc::new(SystemClock);
    let tokens = Arc::new(TokenManager::from_env()?);
    let session_settings = SessionSettings::from_env();
    session_settings.validate().map_err(AppError::InternalError)?;
    let sessions = Arc::new(SessionStore::new(redis_client, clock.clone(), session_settings));

    AuthService::new(
        users,
        tokens,
        sessions,
        clock,
        PasswordConfig::bcrypt_cost(),
        StoreConfig::store_timeout(),
    )
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
async fn start_http_server(auth: Arc<AuthService>) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 JWKS: http://{}/.well-known/jwks.json", bind_address);

    let per_second = ServerConfig::rate_limit_per_second();
    let burst_size = ServerConfig::rate_limit_burst_size();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(per_second)
        .burst_size(burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("rate limit 설정이 올바르지 않습니다"))?;

    info!("🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개", per_second, burst_size);

    let auth_data = web::Data::from(auth.clone());

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(auth_data.clone())
            .configure(configure_all_routes(auth.clone()))
    })
        .bind(bind_address)?
        .workers(4)
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// RUST_LOG=auth_lifecycle::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600)
}
