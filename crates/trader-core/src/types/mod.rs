//! 게이트웨이 전반에서 사용되는 기본 타입.

mod account;
mod balance;
mod token;

pub use account::{AccountId, Credential};
pub use balance::{BalanceDelta, BalanceSnapshot};
pub use token::{TokenClaims, TokenClass, TokenPair};
