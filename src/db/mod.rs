//! Database Connection Management Module
//!
//! 자격 증명 저장소가 사용하는 MongoDB 연결을 관리합니다.
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use crate::config::StoreConfig;
//! use crate::db::Database;
//!
//! let database = Database::new(&StoreConfig::mongodb_uri(), &StoreConfig::database_name()).await?;
//! let users = UserRepository::new(&database).await?;
//! ```

use mongodb::{Client, options::ClientOptions};
use log::info;
use crate::errors::AppError;

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 데이터베이스 연결을 생성합니다.
    ///
    /// 클라이언트를 만든 뒤 `ping` 명령으로 연결 상태를 검증합니다.
    pub async fn new(mongodb_uri: &str, database_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("mongodb uri: {}", e)))?;

        client_options.app_name = Some("auth_lifecycle".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::StoreUnavailable(format!("mongodb client: {}", e)))?;

        client
            .database(database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("mongodb ping: {}", e)))?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name: database_name.to_string(),
        })
    }

    /// 리포지토리에서 컬렉션에 접근할 때 사용하는 `mongodb::Database`
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
