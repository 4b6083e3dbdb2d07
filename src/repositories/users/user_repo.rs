//! # 사용자 리포지토리 구현
//!
//! MongoDB `users` 컬렉션에 대한 [`CredentialStore`] 구현입니다.
//!
//! ## 인덱스
//!
//! | 이름 | 키 | 속성 |
//! |------|----|------|
//! | `email_unique` | `email: 1` | UNIQUE |
//! | `created_at_desc` | `created_at: -1` | |
//!
//! 이메일 유니크 인덱스가 있으므로 동시에 들어온 두 가입 요청 중
//! 하나는 반드시 duplicate key(11000) 오류로 실패하고 `EmailTaken`으로 변환됩니다.

use async_trait::async_trait;
use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};
use crate::db::Database;
use crate::domain::entities::users::user::User;
use crate::errors::AppError;
use super::credential_store::CredentialStore;

const COLLECTION: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

/// 사용자 데이터 액세스 리포지토리
///
/// ```rust,ignore
/// let database = Database::new(&uri, &name).await?;
/// let repo = UserRepository::new(&database).await?;
///
/// let found = repo.find_by_email("john@example.com").await?;
/// ```
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    /// 리포지토리를 만들고 필요한 인덱스를 보장합니다.
    pub async fn new(db: &Database) -> Result<Self, AppError> {
        let repo = Self {
            collection: db.get_database().collection::<User>(COLLECTION),
        };
        repo.create_indexes().await?;
        Ok(repo)
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 이미 중복 이메일이 저장되어 있으면 유니크 인덱스 생성이 실패합니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection
            .create_indexes([email_index, created_at_index])
            .await
            .map_err(database_error)?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(database_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(database_error)
    }

    async fn insert(&self, user: User) -> Result<(), AppError> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::EmailTaken),
            Err(e) => Err(database_error(e)),
        }
    }
}

fn is_duplicate_key(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

fn database_error(error: MongoError) -> AppError {
    AppError::StoreUnavailable(format!("mongodb: {}", error))
}

