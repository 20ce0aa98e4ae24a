//! # Trader Core
//!
//! 트레이딩 API 게이트웨이의 핵심 타입과 협력자 계약을 제공합니다.
//!
//! 이 크레이트는 게이트웨이 전반에서 사용되는 기본 구성 요소를 제공합니다:
//! - 계정 식별자, 토큰 클레임, 잔고 스냅샷 타입
//! - 에러 분류 체계 (입력 / 인증 / 비즈니스 / 협력자)
//! - 자격증명, refresh digest, 원장 저장소 trait
//! - 주입 가능한 시계
//! - 설정 관리
//! - 로깅 인프라

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::*;
pub use error::*;
pub use logging::*;
pub use store::{CredentialStore, LedgerStore, RefreshDigestStore};
pub use types::*;
