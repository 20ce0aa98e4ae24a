//! 잔고 endpoint.
//!
//! 모든 라우트는 `Authorization: Bearer <access token>` 헤더가 필요합니다.
//! 출금은 원장 호출 전에 잔고 가드의 사전 검사를 거칩니다.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use trader_core::{AccountId, GatewayError, GatewayResult};

use crate::auth::AuthUser;
use crate::error::{gateway_error, validation_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_balance_rejection;
use crate::state::AppState;

/// 잔고 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// 계정 ID
    pub id: Uuid,
    /// 현재 잔고
    pub amount: Decimal,
}

/// 입금/출금 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AmountRequest {
    /// 금액 (0보다 커야 함)
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        return Ok(());
    }
    let mut error = ValidationError::new("positive");
    error.message = Some(Cow::Borrowed("금액은 0보다 커야 합니다"));
    Err(error)
}

fn balance_result(
    account_id: AccountId,
    result: GatewayResult<Decimal>,
) -> ApiResult<Json<BalanceResponse>> {
    match result {
        Ok(amount) => Ok(Json(BalanceResponse {
            id: account_id.as_uuid(),
            amount,
        })),
        Err(e) => {
            if matches!(
                e,
                GatewayError::InsufficientFunds | GatewayError::NotEnoughMoney
            ) {
                record_balance_rejection(e.code());
            }
            Err(gateway_error(e))
        }
    }
}

/// 현재 잔고 조회.
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    responses(
        (status = 200, description = "현재 잔고", body = BalanceResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "balance"
)]
pub async fn get_balance(
    AuthUser(account_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BalanceResponse>> {
    balance_result(account_id, state.balances.balance(account_id).await)
}

/// 입금.
#[utoipa::path(
    post,
    path = "/api/v1/balance/deposit",
    request_body = AmountRequest,
    responses(
        (status = 200, description = "입금 후 잔고", body = BalanceResponse),
        (status = 400, description = "0 이하 금액", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "balance"
)]
pub async fn deposit(
    AuthUser(account_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<Json<BalanceResponse>> {
    request.validate().map_err(validation_error)?;

    let result = state.balances.deposit(account_id, request.amount).await;
    balance_result(account_id, result)
}

/// 출금.
///
/// 현재 잔고가 출금액보다 크지 않으면 원장에 도달하기 전에 거부됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/balance/withdraw",
    request_body = AmountRequest,
    responses(
        (status = 200, description = "출금 후 잔고", body = BalanceResponse),
        (status = 400, description = "0 이하 금액", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 402, description = "잔고 부족", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "balance"
)]
pub async fn withdraw(
    AuthUser(account_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<Json<BalanceResponse>> {
    request.validate().map_err(validation_error)?;

    let result = state.balances.withdraw(account_id, request.amount).await;
    balance_result(account_id, result)
}

/// 잔고 라우터 생성.
pub fn balance_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_balance))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
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
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    struct TestApp {
        router: Router,
        token: String,
    }

    impl TestApp {
        async fn new() -> Self {
            let state = Arc::new(create_test_state());
            state
                .sessions
                .sign_up("trader01", "Password123")
                .await
                .unwrap();
            let pair = state
                .sessions
                .login("trader01", "Password123")
                .await
                .unwrap();
            let router = Router::new()
                .nest("/api/v1/balance", balance_router())
                .with_state(state);

            Self {
                router,
                token: pair.access_token,
            }
        }

        async fn get(&self) -> Response {
            self.router
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/v1/balance")
                        .header(AUTHORIZATION, format!("Bearer {}", self.token))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap()
        }

        async fn post(&self, uri: &str, body: Value) -> Response {
            self.router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .header(AUTHORIZATION, format!("Bearer {}", self.token))
                        .header(CONTENT_TYPE, "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap()
        }
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_new_account_has_zero_balance() {
        let app = TestApp::new().await;

        let response = app.get().await;
        assert_eq!(response.status(), StatusCode::OK);
        let balance: BalanceResponse = json_body(response).await;
        assert_eq!(balance.amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_deposit_then_withdraw() {
        let app = TestApp::new().await;

        let response = app
            .post("/api/v1/balance/deposit", json!({ "amount": "100.50" }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let balance: BalanceResponse = json_body(response).await;
        assert_eq!(balance.amount, dec!(100.50));

        let response = app
            .post("/api/v1/balance/withdraw", json!({ "amount": "40.25" }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let balance: BalanceResponse = json_body(response).await;
        assert_eq!(balance.amount, dec!(60.25));
    }

    #[tokio::test]
    async fn test_withdraw_over_balance_is_rejected() {
        let app = TestApp::new().await;
        app.post("/api/v1/balance/deposit", json!({ "amount": "50" }))
            .await;

        let response = app
            .post("/api/v1/balance/withdraw", json!({ "amount": "80" }))
            .await;
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        let error: ApiErrorResponse = json_body(response).await;
        assert_eq!(error.code, "INSUFFICIENT_FUNDS");

        let balance: BalanceResponse = json_body(app.get().await).await;
        assert_eq!(balance.amount, dec!(50));
    }

    #[tokio::test]
    async fn test_withdraw_entire_balance_is_rejected() {
        let app = TestApp::new().await;
        app.post("/api/v1/balance/deposit", json!({ "amount": "50" }))
            .await;

        let response = app
            .post("/api/v1/balance/withdraw", json!({ "amount": "50" }))
            .await;
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn test_deposit_overflow_is_an_error_response() {
        let app = TestApp::new().await;
        let max = json!({ "amount": Decimal::MAX.to_string() });

        let response = app.post("/api/v1/balance/deposit", max.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.post("/api/v1/balance/deposit", max).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let balance: BalanceResponse = json_body(app.get().await).await;
        assert_eq!(balance.amount, Decimal::MAX);
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_bad_request() {
        let app = TestApp::new().await;

        for amount in ["0", "-5"] {
            let response = app
                .post("/api/v1/balance/deposit", json!({ "amount": amount }))
                .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let error: ApiErrorResponse = json_body(response).await;
            assert_eq!(error.code, "INVALID_INPUT");
        }
    }

    #[tokio::test]
    async fn test_balance_requires_bearer() {
        let app = TestApp::new().await;

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let error: ApiErrorResponse = json_body(response).await;
        assert_eq!(error.code, "MISSING_HEADER");
    }
}
