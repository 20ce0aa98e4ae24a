//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 구성 요소는 모두 상태가 없거나 협력자 저장소에 상태를 위임하므로 락이 필요 없습니다.

use std::sync::Arc;

use trader_auth::{Argon2Hasher, AuthGuard, SessionIssuer, TokenCodec};
use trader_core::{AuthConfig, Clock, GatewayError, GatewayResult, HashingConfig};
use trader_risk::BalanceService;

use crate::repository::{MemoryCredentialStore, MemoryDigestStore, MemoryLedger};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 가입, 로그인, 토큰 갱신, 계정 삭제
    pub sessions: Arc<SessionIssuer>,

    /// Bearer 헤더 인증
    pub guard: AuthGuard,

    /// 잔고 조회/변경 (사전 검사 포함)
    pub balances: BalanceService,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 구성 요소로부터 AppState 생성.
    pub fn new(sessions: SessionIssuer, guard: AuthGuard, balances: BalanceService) -> Self {
        Self {
            sessions: Arc::new(sessions),
            guard,
            balances,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 인메모리 저장소를 사용하는 AppState 생성.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidInput`: 서명 키 또는 유효 기간 설정이 유효하지 않음
    /// - `GatewayError::Hashing`: Argon2 파라미터가 유효하지 않음
    pub fn in_memory(
        auth: &AuthConfig,
        hashing: &HashingConfig,
        clock: Arc<dyn Clock>,
    ) -> GatewayResult<Self> {
        auth.validate().map_err(GatewayError::InvalidInput)?;

        let codec = Arc::new(TokenCodec::from_config(auth, clock.clone()));
        let hasher = Arc::new(Argon2Hasher::new(hashing)?);

        let sessions = SessionIssuer::new(
            codec.clone(),
            hasher,
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryDigestStore::new()),
        )
        .with_ttls(auth.access_ttl(), auth.refresh_ttl());

        let guard = AuthGuard::new(codec);
        let balances = BalanceService::new(Arc::new(MemoryLedger::new()), clock);

        Ok(Self::new(sessions, guard, balances))
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// 저비용 Argon2 파라미터와 시스템 시계를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    create_test_state_with_clock(Arc::new(trader_core::SystemClock))
}

/// 주어진 시계를 사용하는 테스트용 AppState 생성.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state_with_clock(clock: Arc<dyn Clock>) -> AppState {
    let auth = AuthConfig::new(
        "access-secret-key-for-api-testing-minimum-32-chars",
        "refresh-secret-key-for-api-testing-minimum-32-chars",
    );
    let hashing = HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    AppState::in_memory(&auth, &hashing, clock).expect("Failed to create test AppState")
}
