//! # Authentication Configuration Module
//!
//! 액세스 토큰 서명, 리프레시 세션 수명, 갱신 잠금 등 인증 관련 설정을 관리합니다.
//!
//! 환경 변수는 [`JwtConfig`]와 [`SessionConfig`]의 정적 접근자로 읽고,
//! 서비스 생성자에는 한 번 만들어진 [`TokenSettings`]와 [`SessionSettings`]를
//! 값으로 넘깁니다. TTL은 프로세스 시작 시 한 번 고정되어 모든 토큰에 동일하게 적용됩니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! # 액세스 토큰
//! export JWT_ALGORITHM="HS256"               # HS256 | RS256
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_PRIVATE_KEY_PATH="./secrets/jwt_private_key.pem"
//! export JWT_PUBLIC_KEY_PATH="./secrets/jwt_public_key.pem"
//! export JWT_ISSUER="auth-service"
//! export JWT_AUDIENCE="backend-services"
//! export JWT_ACCESS_TTL_SECONDS="900"
//! export JWT_CLOCK_SKEW_SECONDS="30"
//!
//! # 리프레시 세션
//! export REFRESH_TTL_SECONDS="1209600"
//! export REFRESH_LOCK_TTL_MS="5000"
//! export REFRESH_LOCK_WAIT_MS="0"
//! ```

use std::env;
use std::time::Duration;

/// 액세스 토큰 서명 알고리즘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// 서버 보유 공유 비밀키 기반 HMAC-SHA256
    Hs256,
    /// RSA 개인키 서명, 공개키(JWKS) 검증
    Rs256,
}

impl SigningAlgorithm {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "HS256" => Ok(SigningAlgorithm::Hs256),
            "RS256" => Ok(SigningAlgorithm::Rs256),
            other => Err(format!("Unsupported JWT algorithm: {}", other)),
        }
    }
}

/// JWT 액세스 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    /// 서명 알고리즘 (기본값: HS256)
    pub fn algorithm() -> Result<SigningAlgorithm, String> {
        SigningAlgorithm::from_str(&env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()))
    }

    /// HS256 공유 비밀키
    ///
    /// `JWT_SECRET`이 없거나 비어 있으면 에러를 반환합니다.
    pub fn secret() -> Result<String, String> {
        env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "JWT_SECRET must be set".to_string())
    }

    pub fn private_key_path() -> String {
        env::var("JWT_PRIVATE_KEY_PATH").unwrap_or_else(|_| "./secrets/jwt_private_key.pem".to_string())
    }

    pub fn public_key_path() -> String {
        env::var("JWT_PUBLIC_KEY_PATH").unwrap_or_else(|_| "./secrets/jwt_public_key.pem".to_string())
    }

    pub fn issuer() -> String {
        env::var("JWT_ISSUER").unwrap_or_else(|_| "auth-service".to_string())
    }

    pub fn audience() -> String {
        env::var("JWT_AUDIENCE").unwrap_or_else(|_| "backend-services".to_string())
    }

    /// 액세스 토큰 TTL (초, 기본값: 900 = 15분)
    pub fn access_ttl_seconds() -> i64 {
        parse_positive("JWT_ACCESS_TTL_SECONDS", 900)
    }

    /// 만료 검사 시 허용하는 시계 오차 (초, 기본값: 30)
    pub fn clock_skew_seconds() -> i64 {
        env::var("JWT_CLOCK_SKEW_SECONDS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(30)
    }
}

/// 리프레시 세션 설정
pub struct SessionConfig;

impl SessionConfig {
    /// 리프레시 토큰 세대 하나의 TTL (초, 기본값: 14일)
    pub fn refresh_ttl_seconds() -> i64 {
        parse_positive("REFRESH_TTL_SECONDS", 14 * 24 * 3600)
    }

    /// 패밀리 잠금의 최대 보유 시간 (밀리초, 기본값: 5000)
    pub fn lock_ttl_ms() -> u64 {
        parse_positive("REFRESH_LOCK_TTL_MS", 5000) as u64
    }

    /// 잠금이 점유 중일 때 기다리는 최대 시간 (밀리초, 기본값: 0 = 즉시 실패)
    pub fn lock_wait_ms() -> u64 {
        env::var("REFRESH_LOCK_WAIT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
    }
}

fn parse_positive(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// 토큰 매니저 생성 시 주입되는 설정
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    /// 발급 시각과 만료 시각의 차이 (초)
    pub access_ttl_seconds: i64,
    pub clock_skew_seconds: i64,
}

impl TokenSettings {
    pub fn from_env() -> Self {
        Self {
            issuer: JwtConfig::issuer(),
            audience: JwtConfig::audience(),
            access_ttl_seconds: JwtConfig::access_ttl_seconds(),
            clock_skew_seconds: JwtConfig::clock_skew_seconds(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: "auth-service".to_string(),
            audience: "backend-services".to_string(),
            access_ttl_seconds: 900,
            clock_skew_seconds: 30,
        }
    }
}

/// 세션 저장소 생성 시 주입되는 설정
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub refresh_ttl_seconds: i64,
    pub lock_ttl: Duration,
    pub lock_wait: Duration,
    /// 저장소 호출 하나의 데드라인
    pub store_timeout: Duration,
}

impl SessionSettings {
    /// 회전의 커밋 쓰기 두 번이 잠금 TTL 안에 끝날 수 있는지 확인합니다.
    pub fn validate(&self) -> Result<(), String> {
        if self.lock_ttl <= self.store_timeout * 2 {
            return Err(format!(
                "REFRESH_LOCK_TTL_MS ({:?}) must exceed twice STORE_TIMEOUT_MS ({:?})",
                self.lock_ttl, self.store_timeout
            ));
        }
        Ok(())
    }

    pub fn from_env() -> Self {
        Self {
            refresh_ttl_seconds: SessionConfig::refresh_ttl_seconds(),
            lock_ttl: Duration::from_millis(SessionConfig::lock_ttl_ms()),
            lock_wait: Duration::from_millis(SessionConfig::lock_wait_ms()),
            store_timeout: crate::config::StoreConfig::store_timeout(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            refresh_ttl_seconds: 14 * 24 * 3600,
            lock_ttl: Duration::from_millis(5000),
            lock_wait: Duration::ZERO,
            store_timeout: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_settings_require_lock_ttl_above_commit_budget() {
        assert!(SessionSettings::default().validate().is_ok());

        let tight = SessionSettings {
            lock_ttl: Duration::from_millis(4000),
            ..SessionSettings::default()
        };
        assert!(tight.validate().is_err());
    }

    #[test]
    fn test_signing_algorithm_from_string() {
        assert_eq!(SigningAlgorithm::from_str("HS256").unwrap(), SigningAlgorithm::Hs256);
        assert_eq!(SigningAlgorithm::from_str("rs256").unwrap(), SigningAlgorithm::Rs256);
        assert!(SigningAlgorithm::from_str("none").is_err());
    }

    #[test]
    fn test_default_token_settings() {
        let settings = TokenSettings::default();
        assert_eq!(settings.access_ttl_seconds, 900);
        assert_eq!(settings.clock_skew_seconds, 30);
    }

    #[test]
    fn test_default_session_settings_fail_fast_on_lock() {
        let settings = SessionSettings::default();
        assert_eq!(settings.lock_wait, Duration::ZERO);
        assert!(settings.lock_ttl > Duration::ZERO);
    }
}
