//! 잔고 변경 가드.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 출금 전 잔고 스냅샷 기반 초과 인출 사전 검사
//! - 검사를 통과한 변경의 원장 위임 (입금, 출금, 잔고 조회)
//!
//! # 예제
//!
//! ```rust,ignore
//! use trader_risk::BalanceService;
//!
//! let service = BalanceService::new(ledger, clock);
//!
//! // 잔고 100에서 100 출금은 거부 (잔고가 출금액보다 커야 함)
//! let result = service.withdraw(account_id, dec!(100)).await;
//! assert_eq!(result, Err(GatewayError::InsufficientFunds));
//! ```

pub mod balance;

// 주요 타입 재내보내기
pub use balance::{BalanceGuard, BalanceService};
