//! 사용자 자격 증명 저장소 모듈
//!
//! [`CredentialStore`](credential_store::CredentialStore) trait과
//! MongoDB 구현([`UserRepository`](user_repo::UserRepository)),
//! 인메모리 구현([`InMemoryCredentialStore`](credential_store::InMemoryCredentialStore))을 제공합니다.

pub mod credential_store;
pub mod user_repo;

pub use credential_store::*;
pub use user_repo::*;
