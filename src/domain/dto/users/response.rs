//! 사용자 응답 DTO
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::role::Role;

/// 클라이언트에 노출되는 사용자 정보 (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
