//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 저장소 구현은 생성자로 주입되며 서비스는 trait 객체로만 접근합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::{CredentialStore, UserRepository};
//!
//! let users: Arc<dyn CredentialStore> = Arc::new(UserRepository::new(&database).await?);
//! let user = users.find_by_email("user@example.com").await?;
//! ```

pub mod users;
