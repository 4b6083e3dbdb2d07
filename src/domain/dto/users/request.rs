//! 가입/로그인 요청 DTO
use serde::Deserialize;
use validator::Validate;

/// 회원가입 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "비밀번호는 8자 이상 128자 이하여야 합니다"))]
    pub password: String,
}

/// 로컬 로그인 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}
