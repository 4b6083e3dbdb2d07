//! 인증 코어 전역에서 사용하는 에러 시스템
//!
//! 인증 엔진이 호출자에게 돌려주는 모든 실패 조건을 하나의 열거형으로 표현합니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 에러 분류
//!
//! | AppError | HTTP Status | 재시도 가능 |
//! |----------|-------------|-------------|
//! | `ValidationError` | 400 Bad Request | X |
//! | `InvalidCredentials` | 401 Unauthorized | X |
//! | `EmailTaken` | 409 Conflict | X |
//! | `TokenMalformed` / `TokenExpired` / `AudienceMismatch` | 401 Unauthorized | X |
//! | `ReplayDetected` | 401 Unauthorized (보안 이벤트) | X |
//! | `SessionExpired` | 401 Unauthorized | X |
//! | `RefreshInProgress` | 429 Too Many Requests | O |
//! | `InsufficientRole` | 403 Forbidden | X |
//! | `StoreUnavailable` | 503 Service Unavailable | O |
//! | `InternalError` | 500 Internal Server Error | X |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn login(email: &str, password: &str) -> Result<TokenPair, AppError> {
//!     let user = store.find_by_email(email).await?
//!         .ok_or(AppError::InvalidCredentials)?;
//!     // ...
//! }
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 각 변형은 호출자에게 보이는 하나의 조건과 1:1로 대응합니다.
/// 핸들러 계층은 이 값을 HTTP 응답으로 변환하지만, 종류(`kind`)는
/// 로그에 그대로 보존됩니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// 입력값 형식 오류 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 이메일 또는 비밀번호 불일치 (401 Unauthorized)
    ///
    /// 존재하지 않는 이메일과 잘못된 비밀번호를 구분하지 않습니다.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 이미 가입된 이메일 (409 Conflict)
    #[error("Email already registered")]
    EmailTaken,

    /// 파싱 불가, 서명 불일치, 발급자 불일치 토큰 (401 Unauthorized)
    #[error("Token malformed")]
    TokenMalformed,

    /// 허용 오차를 넘어 만료된 액세스 토큰 (401 Unauthorized)
    #[error("Token expired")]
    TokenExpired,

    /// 토큰의 audience가 이 서비스 집합과 다름 (401 Unauthorized)
    #[error("Token audience mismatch")]
    AudienceMismatch,

    /// 이미 교체된 리프레시 토큰이 다시 제시됨 (401 Unauthorized)
    ///
    /// 세션 패밀리 전체가 폐기된 뒤에 반환됩니다. 보안 이벤트로 취급합니다.
    #[error("Refresh token replay detected")]
    ReplayDetected,

    /// 만료되었거나 로그아웃된 세션 (401 Unauthorized)
    #[error("Session expired")]
    SessionExpired,

    /// 같은 패밀리에 대한 갱신이 이미 진행 중 (429 Too Many Requests)
    #[error("Refresh already in progress")]
    RefreshInProgress,

    /// 라우트가 요구하는 역할이 없음 (403 Forbidden)
    #[error("Insufficient role")]
    InsufficientRole,

    /// 저장소 연결 실패 또는 타임아웃 (503 Service Unavailable)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// 설정 오류, 직렬화 실패 등 내부 오류 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 로그와 응답 본문에 쓰이는 안정적인 에러 종류 태그
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::EmailTaken => "email_taken",
            AppError::TokenMalformed => "token_malformed",
            AppError::TokenExpired => "token_expired",
            AppError::AudienceMismatch => "audience_mismatch",
            AppError::ReplayDetected => "replay_detected",
            AppError::SessionExpired => "session_expired",
            AppError::RefreshInProgress => "refresh_in_progress",
            AppError::InsufficientRole => "insufficient_role",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// 상위 호출자가 백오프 후 재시도해도 되는 에러인지 확인
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_) | AppError::RefreshInProgress)
    }

    /// 알림 대상인 보안 이벤트인지 확인
    pub fn is_security_event(&self) -> bool {
        matches!(self, AppError::ReplayDetected)
    }

    /// 액세스 토큰 검증 실패 계열인지 확인
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AppError::TokenMalformed | AppError::TokenExpired | AppError::AudienceMismatch
        )
    }

    /// 클라이언트에게 노출할 메시지
    ///
    /// 토큰 검증 실패는 구체적인 원인을 숨기고 일반 메시지로 통일합니다.
    /// 내부/인프라 오류도 상세 내용을 노출하지 않습니다.
    pub fn public_message(&self) -> String {
        match self {
            e if e.is_token_failure() => "invalid token".to_string(),
            AppError::StoreUnavailable(_) => "service temporarily unavailable".to_string(),
            AppError::InternalError(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::TokenMalformed
            | AppError::TokenExpired
            | AppError::AudienceMismatch
            | AppError::ReplayDetected
            | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::RefreshInProgress => StatusCode::TOO_MANY_REQUESTS,
            AppError::InsufficientRole => StatusCode::FORBIDDEN,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 응답 본문은 `{"error": kind, "message": public_message}` 형식입니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let mut builder = actix_web::HttpResponse::build(self.status_code());
        if self.is_retryable() {
            builder.insert_header((actix_web::http::header::RETRY_AFTER, "1"));
        }

        builder.json(serde_json::json!({
            "error": self.kind(),
            "message": self.public_message(),
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
