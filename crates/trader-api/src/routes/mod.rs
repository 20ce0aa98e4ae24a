//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 버전 및 업타임 (readiness)
//! - `/api/v1/auth` - 가입, 로그인, 토큰 갱신
//! - `/api/v1/account` - 계정 삭제, 비밀번호 변경 (인증 필요)
//! - `/api/v1/balance` - 잔고 조회, 입금, 출금 (인증 필요)

pub mod account;
pub mod auth;
pub mod balance;
pub mod health;

pub use account::{account_router, AccountDeletedResponse, ChangePasswordRequest};
pub use auth::{
    auth_router, CredentialsRequest, LoginRequest, RefreshRequest, SignUpResponse,
    TokenResponse,
};
pub use balance::{balance_router, AmountRequest, BalanceResponse};
pub use health::{health_router, HealthResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/account", account_router())
        .nest("/api/v1/balance", balance_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE},
            Request, StatusCode,
        },
        response::Response,
    };
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use trader_core::ManualClock;

    use crate::error::ApiErrorResponse;
    use crate::state::create_test_state_with_clock;

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_session_and_balance_flow() {
        let clock = Arc::new(ManualClock::starting_now());
        let app = create_api_router().with_state(Arc::new(create_test_state_with_clock(
            clock.clone(),
        )));
        let credentials = json!({ "login": "trader01", "password": "Password123" });

        let response = call(&app, "POST", "/api/v1/auth/signup", None, Some(credentials.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let t1: TokenResponse = json_body(
            call(&app, "POST", "/api/v1/auth/login", None, Some(credentials.clone())).await,
        )
        .await;

        let response = call(
            &app,
            "POST",
            "/api/v1/balance/deposit",
            Some(&t1.access_token),
            Some(json!({ "amount": "25" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        // T1 -> T2, T1 재사용 거부, T2 -> T3
        let refresh_body = |t: &TokenResponse| {
            json!({ "access_token": t.access_token, "refresh_token": t.refresh_token })
        };
        let t2: TokenResponse = json_body(
            call(&app, "POST", "/api/v1/auth/refresh", None, Some(refresh_body(&t1))).await,
        )
        .await;
        let replay = call(&app, "POST", "/api/v1/auth/refresh", None, Some(refresh_body(&t1))).await;
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
        let response = call(&app, "POST", "/api/v1/auth/refresh", None, Some(refresh_body(&t2))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let t3: TokenResponse = json_body(response).await;

        let balance: BalanceResponse =
            json_body(call(&app, "GET", "/api/v1/balance", Some(&t3.access_token), None).await)
                .await;
        assert_eq!(balance.amount, dec!(25));

        // access token 만료 후에는 보호된 라우트가 거부된다
        clock.advance(Duration::minutes(16));
        let response = call(&app, "GET", "/api/v1/balance", Some(&t3.access_token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let error: ApiErrorResponse = json_body(response).await;
        assert_eq!(error.code, "INVALID_TOKEN");

        let response = call(&app, "POST", "/api/v1/auth/login", None, Some(credentials)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_accepted_as_bearer() {
        let app = create_api_router().with_state(Arc::new(
            crate::state::create_test_state(),
        ));
        let credentials = json!({ "login": "trader01", "password": "Password123" });
        call(&app, "POST", "/api/v1/auth/signup", None, Some(credentials.clone())).await;
        let tokens: TokenResponse = json_body(
            call(&app, "POST", "/api/v1/auth/login", None, Some(credentials)).await,
        )
        .await;

        let response = call(&app, "GET", "/api/v1/balance", Some(&tokens.refresh_token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
