//! 요청 인증.
//!
//! Bearer 토큰 검증은 `trader-auth`의 [`AuthGuard`](trader_auth::AuthGuard)가 담당하며,
//! 이 모듈은 이를 Axum 추출기로 연결합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     AuthUser(account_id): AuthUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", account_id)
//! }
//! ```

mod middleware;

pub use middleware::AuthUser;
