//! # 시계 추상화
//!
//! 세션 만료와 토큰 만료 판단은 모두 UTC Unix 초 단위로 이루어집니다.
//! 서비스는 [`Clock`]을 생성자로 주입받아, 테스트에서는 [`ManualClock`]으로
//! 시간 경계를 정확히 재현할 수 있습니다.

use std::sync::atomic::{AtomicI64, Ordering};
use chrono::Utc;

/// 현재 시각 제공자
pub trait Clock: Send + Sync {
    /// 현재 UTC Unix 시각 (초)
    fn now(&self) -> i64;

    /// 현재 UTC Unix 시각 (밀리초). 잠금 보유 시간 측정에 사용합니다.
    fn now_millis(&self) -> i64 {
        self.now() * 1000
    }
}

/// 시스템 시계
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// 수동으로 조작하는 시계
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self { now: AtomicI64::new(now) }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
