//! 공통 유틸리티
//!
//! - [`clock`] - 주입 가능한 UTC 시계
//! - [`deadline`] - 저장소 호출 데드라인

pub mod clock;
pub mod deadline;

pub use clock::*;
pub use deadline::*;
