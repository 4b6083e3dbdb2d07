//! 리프레시 토큰 와이어 포맷
//!
//! 클라이언트가 보관하는 리프레시 토큰은 `{family_id}.{generation}.{secret}` 형태의
//! 불투명 문자열입니다. 서버는 `secret`의 SHA-256 해시만 저장하고, 원문은 저장하지 않습니다.
//!
//! ```text
//! 3f2c0a6e9b1d4c8e8f7a6b5c4d3e2f10.4.q1o0yJm3...(43 chars)
//! └──────────── family_id ───────┘ │ └── secret (base64url, 256bit) ──┘
//!                               generation
//! ```

use std::fmt;
use std::str::FromStr;
use base64::{engine::general_purpose, Engine as _};
use rsa::rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::errors::AppError;

const SECRET_BYTES: usize = 32;

/// 디코딩된 리프레시 토큰
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub family_id: String,
    pub generation: u64,
    secret: String,
}

impl RefreshToken {
    pub fn new(family_id: String, generation: u64, secret: String) -> Self {
        Self { family_id, generation, secret }
    }

    /// 새 무작위 비밀값을 가진 토큰을 생성합니다.
    pub fn generate(family_id: String, generation: u64) -> Self {
        Self::new(family_id, generation, generate_secret())
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// 저장소에 기록되는 비밀값 해시
    pub fn secret_hash(&self) -> String {
        hash_secret(&self.secret)
    }

    /// 클라이언트에 전달되는 문자열로 인코딩합니다.
    pub fn encode(&self) -> String {
        format!("{}.{}.{}", self.family_id, self.generation, self.secret)
    }

    /// 클라이언트가 제시한 문자열을 디코딩합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenMalformed` - 구분자, 패밀리 ID, 세대, 비밀값 중 하나라도 형식이 틀린 경우
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut parts = raw.trim().splitn(3, '.');
        let (Some(family_id), Some(generation), Some(secret)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AppError::TokenMalformed);
        };

        let family = Uuid::parse_str(family_id).map_err(|_| AppError::TokenMalformed)?;
        let generation = generation.parse::<u64>().map_err(|_| AppError::TokenMalformed)?;

        let decoded = general_purpose::URL_SAFE_NO_PAD
            .decode(secret)
            .map_err(|_| AppError::TokenMalformed)?;
        if decoded.len() != SECRET_BYTES {
            return Err(AppError::TokenMalformed);
        }

        Ok(Self::new(family.simple().to_string(), generation, secret.to_string()))
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("family_id", &self.family_id)
            .field("generation", &self.generation)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for RefreshToken {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 새 패밀리 ID (하이픈 없는 UUID v4)
pub fn new_family_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// 256비트 무작위 비밀값을 base64url로 인코딩해 반환합니다.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// 비밀값의 SHA-256 해시 (16진수)
pub fn hash_secret(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 길이가 같은 두 해시 문자열을 상수 시간에 비교합니다.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
