//! 저장소 호출 데드라인
//!
//! 코어 내부의 어떤 연산도 무기한 대기하지 않도록, 외부 저장소 호출은
//! 호출자가 정한 시간 안에 끝나지 않으면 `StoreUnavailable`로 실패합니다.

use std::future::Future;
use std::time::Duration;
use actix_web::rt::time::timeout;
use crate::errors::AppError;

/// `fut`를 `limit` 안에 완료시키고, 시간이 초과되면 `StoreUnavailable`을 반환합니다.
pub async fn with_deadline<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            log::error!("저장소 호출 타임아웃 - operation: {}, limit: {:?}", operation, limit);
            Err(AppError::StoreUnavailable(format!("{} timed out after {:?}", operation, limit)))
        }
    }
}
