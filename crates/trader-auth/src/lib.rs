//! 인증 및 세션 수명 주기.
//!
//! 서명 토큰 발급/검증, refresh 토큰 회전, Bearer 헤더 인증을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenCodec`]: access/refresh 토큰 서명 및 검증
//! - [`SecretHasher`]: 비밀번호와 refresh digest용 느린 해시 (Argon2id)
//! - [`SessionIssuer`]: 가입, 로그인, 토큰 갱신, 계정 삭제
//! - [`AuthGuard`]: `Authorization` 헤더 → 계정 식별자
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let pair = issuer.login("trader01", "Password123").await?;
//! let account_id = guard.authenticate(Some(&format!("Bearer {}", pair.access_token)))?;
//! let rotated = issuer.refresh(&pair).await?;
//! ```

mod digest;
mod guard;
mod password;
mod session;
mod token;

pub use digest::refresh_digest;
pub use guard::{AuthGuard, BEARER_PREFIX};
pub use password::{validate_login, validate_password_strength, Argon2Hasher, SecretHasher};
pub use session::{SessionIssuer, DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_HOURS};
pub use token::TokenCodec;
