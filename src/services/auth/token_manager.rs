//! 액세스 토큰 발급 및 검증
//!
//! 서명된 자기 완결형 액세스 토큰(JWT)을 만들고 검증하는 무상태 컴포넌트입니다.
//! I/O가 없으므로 동기화 없이 여러 요청에서 공유됩니다.
//!
//! # 서명 방식
//!
//! - **HS256**: 서버가 보유한 공유 비밀키(`JWT_SECRET`)
//! - **RS256**: RSA 개인키로 서명하고, 다른 백엔드 서비스는 [`TokenManager::jwks`]로
//!   공개된 공개키만으로 검증
//!
//! # 만료 판단
//!
//! 만료는 라이브러리 기본 검사 대신 호출자가 넘긴 `now`로 직접 판단합니다.
//! `now < exp + clock_skew`일 때만 유효합니다.
//!
//! ```rust,ignore
//! let manager = TokenManager::hs256(b"secret", TokenSettings::default());
//! let claims = manager.claims_for(&user, now);
//! let token = manager.issue(&claims)?;
//!
//! assert_eq!(manager.verify(&token, now)?, claims);
//! ```

use std::fs;
use std::path::Path;
use base64::{Engine as _, engine::general_purpose};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::{RsaPrivateKey, RsaPublicKey, pkcs1::EncodeRsaPrivateKey, pkcs8::{DecodePublicKey, EncodePublicKey}};
use uuid::Uuid;
use crate::config::{JwtConfig, SigningAlgorithm, TokenSettings};
use crate::domain::entities::users::user::User;
use crate::domain::models::token::token::AccessTokenClaims;
use crate::errors::{AppError, AppResult, ErrorContext};

const KEY_ID: &str = "auth-lifecycle-key-1";

/// 액세스 토큰 매니저
pub struct TokenManager {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    settings: TokenSettings,
    /// RS256일 때만 존재하며 JWKS 생성에 사용됩니다.
    public_key: Option<RsaPublicKey>,
}

impl TokenManager {
    /// 공유 비밀키 기반 HS256 매니저
    pub fn hs256(secret: &[u8], settings: TokenSettings) -> Self {
        Self::build(
            Algorithm::HS256,
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
            settings,
            None,
        )
    }

    /// RSA 키 쌍 기반 RS256 매니저
    ///
    /// 개인키는 PKCS#1 또는 PKCS#8 PEM, 공개키는 SPKI PEM을 받습니다.
    pub fn rs256(private_key_pem: &str, public_key_pem: &str, settings: TokenSettings) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .context("RSA 개인키 로딩 실패")?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .context("RSA 공개키 로딩 실패")?;
        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
            .context("RSA 공개키 파싱 실패")?;

        Ok(Self::build(Algorithm::RS256, encoding_key, decoding_key, settings, Some(public_key)))
    }

    /// 환경 변수로부터 매니저를 생성합니다.
    ///
    /// RS256에서 키 파일이 없으면 새 키 쌍을 생성해 저장합니다.
    pub fn from_env() -> AppResult<Self> {
        let settings = TokenSettings::from_env();
        let algorithm = JwtConfig::algorithm().map_err(AppError::InternalError)?;

        match algorithm {
            SigningAlgorithm::Hs256 => {
                let secret = JwtConfig::secret().map_err(AppError::InternalError)?;
                Ok(Self::hs256(secret.as_bytes(), settings))
            }
            SigningAlgorithm::Rs256 => {
                let private_key_path = JwtConfig::private_key_path();
                let public_key_path = JwtConfig::public_key_path();

                if !Path::new(&private_key_path).exists() || !Path::new(&public_key_path).exists() {
                    log::info!("🔑 JWT keys not found. Generating new RSA key pair...");
                    generate_rsa_keys(&private_key_path, &public_key_path)?;
                } else {
                    log::info!("🔑 Loading existing JWT RSA keys");
                }

                let private_key_pem = fs::read_to_string(&private_key_path)
                    .with_context(|| format!("개인키 파일 읽기 실패 '{}'", private_key_path))?;
                let public_key_pem = fs::read_to_string(&public_key_path)
                    .with_context(|| format!("공개키 파일 읽기 실패 '{}'", public_key_path))?;

                Self::rs256(&private_key_pem, &public_key_pem, settings)
            }
        }
    }

    fn build(
        algorithm: Algorithm,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        settings: TokenSettings,
        public_key: Option<RsaPublicKey>,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        // 만료는 verify에서 주입된 시각으로 직접 검사
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);

        Self {
            algorithm,
            encoding_key,
            decoding_key,
            validation,
            settings,
            public_key,
        }
    }

    /// 발급되는 모든 토큰에 적용되는 TTL (초)
    pub fn access_ttl_seconds(&self) -> i64 {
        self.settings.access_ttl_seconds
    }

    /// 사용자 레코드로부터 `now` 시각에 발급할 클레임을 만듭니다.
    pub fn claims_for(&self, user: &User, now: i64) -> AccessTokenClaims {
        AccessTokenClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.settings.access_ttl_seconds,
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// 클레임에 서명합니다. 부작용은 없습니다.
    pub fn issue(&self, claims: &AccessTokenClaims) -> AppResult<String> {
        let mut header = Header::new(self.algorithm);
        if self.public_key.is_some() {
            header.kid = Some(KEY_ID.to_string());
        }

        encode(&header, claims, &self.encoding_key).context("JWT 토큰 생성 실패")
    }

    /// 서명, 발급자/대상, 만료를 검사하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `TokenMalformed` - 파싱 불가, 서명 불일치, 발급자 불일치, 미래 발급 시각
    /// * `AudienceMismatch` - 대상 서비스 불일치
    /// * `TokenExpired` - `now >= exp + clock_skew`
    pub fn verify(&self, token: &str, now: i64) -> AppResult<AccessTokenClaims> {
        let claims = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAudience => AppError::AudienceMismatch,
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenMalformed,
            })?;

        let skew = self.settings.clock_skew_seconds;
        if now >= claims.exp + skew {
            return Err(AppError::TokenExpired);
        }
        if claims.iat > now + skew {
            return Err(AppError::TokenMalformed);
        }

        Ok(claims)
    }

    /// JWKS(JSON Web Key Set) 형식의 공개키 정보
    ///
    /// HS256에서는 공개할 키가 없으므로 빈 키 집합을 반환합니다.
    pub fn jwks(&self) -> serde_json::Value {
        use rsa::traits::PublicKeyParts;

        let Some(public_key) = &self.public_key else {
            return serde_json::json!({ "keys": [] });
        };

        let n = general_purpose::URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let e = general_purpose::URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "use": "sig",
                "kid": KEY_ID,
                "n": n,
                "e": e,
                "alg": "RS256"
            }]
        })
    }
}

/// RSA 키 쌍(2048비트)을 생성하여 PEM 파일로 저장합니다.
fn generate_rsa_keys(private_key_path: &str, public_key_path: &str) -> AppResult<()> {
    if let Some(parent) = Path::new(private_key_path).parent() {
        fs::create_dir_all(parent).context("secrets 디렉토리 생성 실패")?;
    }

    let private_key = RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048).context("RSA 키 생성 실패")?;
    let public_key = private_key.to_public_key();

    let private_key_pem = private_key
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .context("개인키 인코딩 실패")?;
    fs::write(private_key_path, private_key_pem.as_bytes()).context("개인키 저장 실패")?;

    let public_key_pem = public_key
        .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
        .context("공개키 인코딩 실패")?;
    fs::write(public_key_path, public_key_pem.as_bytes()).context("공개키 저장 실패")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(private_key_path, fs::Permissions::from_mode(0o600)).context("개인키 권한 설정 실패")?;
        fs::set_permissions(public_key_path, fs::Permissions::from_mode(0o644)).context("공개키 권한 설정 실패")?;
    }

    log::info!("📁 Private key saved: {}", private_key_path);
    log::info!("📁 Public key saved: {}", public_key_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::auth::role::Role;

    const NOW: i64 = 1_700_000_000;
    const PRIVATE_PEM: &str = include_str!("testdata/jwt_private_key.pem");
    const PUBLIC_PEM: &str = include_str!("testdata/jwt_public_key.pem");

    fn manager() -> TokenManager {
        TokenManager::hs256(b"test-secret", TokenSettings::default())
    }

    fn user() -> User {
        User::new_local("alice@example.com".to_string(), "hash".to_string()).with_role(Role::Seller)
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let manager = manager();
        let claims = manager.claims_for(&user(), NOW);
        let token = manager.issue(&claims).unwrap();

        let verified = manager.verify(&token, NOW).unwrap();
        assert_eq!(verified, claims);
        assert_eq!(verified.role, Role::Seller);
        assert_eq!(verified.exp - verified.iat, 900);
    }

    #[test]
    fn test_expiry_boundary_with_skew() {
        let manager = manager();
        let claims = manager.claims_for(&user(), NOW);
        let token = manager.issue(&claims).unwrap();

        assert!(manager.verify(&token, claims.exp - 1).is_ok());
        // 오차 범위 안에서는 아직 유효
        assert!(manager.verify(&token, claims.exp + 29).is_ok());
        assert_eq!(manager.verify(&token, claims.exp + 30), Err(AppError::TokenExpired));
        assert_eq!(manager.verify(&token, claims.exp + 31), Err(AppError::TokenExpired));
    }

    #[test]
    fn test_tampered_and_garbage_tokens_are_malformed() {
        let manager = manager();
        let token = manager.issue(&manager.claims_for(&user(), NOW)).unwrap();

        let forged_payload = general_purpose::URL_SAFE_NO_PAD.encode(
            br#"{"sub":"x","email":"x@example.com","role":"admin","iat":1700000000,"exp":1800000000,"iss":"auth-service","aud":"backend-services","jti":"j"}"#,
        );
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        assert_eq!(manager.verify(&forged, NOW), Err(AppError::TokenMalformed));
        assert_eq!(manager.verify("garbage", NOW), Err(AppError::TokenMalformed));

        let other = TokenManager::hs256(b"other-secret", TokenSettings::default());
        assert_eq!(other.verify(&token, NOW), Err(AppError::TokenMalformed));
    }

    #[test]
    fn test_audience_and_issuer_mismatch() {
        let manager = manager();

        let foreign_audience = TokenManager::hs256(
            b"test-secret",
            TokenSettings { audience: "billing".to_string(), ..TokenSettings::default() },
        );
        let token = foreign_audience.issue(&foreign_audience.claims_for(&user(), NOW)).unwrap();
        assert_eq!(manager.verify(&token, NOW), Err(AppError::AudienceMismatch));

        let foreign_issuer = TokenManager::hs256(
            b"test-secret",
            TokenSettings { issuer: "someone-else".to_string(), ..TokenSettings::default() },
        );
        let token = foreign_issuer.issue(&foreign_issuer.claims_for(&user(), NOW)).unwrap();
        assert_eq!(manager.verify(&token, NOW), Err(AppError::TokenMalformed));
    }

    #[test]
    fn test_token_from_the_future_is_rejected() {
        let manager = manager();
        let token = manager.issue(&manager.claims_for(&user(), NOW + 120)).unwrap();

        assert_eq!(manager.verify(&token, NOW), Err(AppError::TokenMalformed));
        assert!(manager.verify(&token, NOW + 100).is_ok());
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let manager = manager();
        let first = manager.claims_for(&user(), NOW);
        let second = manager.claims_for(&user(), NOW);

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_rs256_sign_verify_and_jwks() {
        let rs = TokenManager::rs256(PRIVATE_PEM, PUBLIC_PEM, TokenSettings::default()).unwrap();
        let claims = rs.claims_for(&user(), NOW);
        let token = rs.issue(&claims).unwrap();

        assert_eq!(rs.verify(&token, NOW).unwrap(), claims);

        let jwks = rs.jwks();
        assert_eq!(jwks["keys"][0]["kty"], "RSA");
        assert_eq!(jwks["keys"][0]["kid"], KEY_ID);
        assert_eq!(jwks["keys"][0]["e"], "AQAB");

        // HS256 매니저는 RS256 토큰을 받아들이지 않음
        let hs = manager();
        assert_eq!(hs.verify(&token, NOW), Err(AppError::TokenMalformed));
        assert_eq!(hs.jwks()["keys"].as_array().map(|keys| keys.len()), Some(0));
    }
}
