//! 액세스 토큰 클레임 및 클라이언트에 전달되는 토큰 쌍
//!
//! RFC 7519 표준 클레임(`sub`, `iat`, `exp`, `iss`, `aud`, `jti`)과
//! 애플리케이션 클레임(`email`, `role`)으로 구성됩니다.
use serde::{Deserialize, Serialize};
use crate::domain::models::auth::role::Role;

/// 액세스 토큰의 클레임(Payload)
///
/// 서명된 토큰 안에만 존재하며 서버 측에 저장되지 않습니다.
/// 모든 시각은 UTC Unix 초이며, `exp - iat`는 항상 설정된 TTL과 같습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// 토큰의 주체 (사용자 ID)
    pub sub: String,
    /// 사용자 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// 발급자
    pub iss: String,
    /// 대상 서비스
    pub aud: String,
    /// 토큰 고유 식별자
    pub jti: String,
}

/// 토큰 쌍
///
/// OAuth 2.0 토큰 응답 형식을 따릅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// 액세스 토큰 (서명된 JWT)
    pub access_token: String,
    /// 리프레시 토큰 (불투명 문자열)
    pub refresh_token: String,
    /// 항상 `Bearer`
    pub token_type: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
