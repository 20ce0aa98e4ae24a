//! 세션 endpoint.
//!
//! 가입, 로그인, 토큰 갱신을 제공합니다. 이 라우트들은 Bearer 인증을 요구하지 않습니다.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use trader_core::{GatewayResult, TokenPair};

use crate::error::{gateway_error, validation_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_session_event;
use crate::state::AppState;

// =============================================================================
// 요청/응답 타입
// =============================================================================

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// 로그인 (5~20자)
    #[validate(length(min = 5, max = 20, message = "로그인은 5자 이상 20자 이하여야 합니다"))]
    pub login: String,
    /// 비밀번호
    #[validate(length(min = 1, message = "비밀번호가 필요합니다"))]
    pub password: String,
}

/// 로그인 요청.
///
/// 로그인 길이는 검사하지 않습니다. 규칙에 맞지 않는 로그인은 존재하지 않는 로그인과
/// 같은 `INVALID_CREDENTIALS`로 응답합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// 로그인
    #[validate(length(min = 1, message = "로그인이 필요합니다"))]
    pub login: String,
    /// 비밀번호
    #[validate(length(min = 1, message = "비밀번호가 필요합니다"))]
    pub password: String,
}

/// 토큰 갱신 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    /// 현재 Access Token
    #[validate(length(min = 1, message = "access_token이 필요합니다"))]
    pub access_token: String,
    /// 현재 Refresh Token
    #[validate(length(min = 1, message = "refresh_token이 필요합니다"))]
    pub refresh_token: String,
}

/// 가입 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignUpResponse {
    /// 새 계정 ID
    pub id: Uuid,
}

/// 토큰 쌍 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Access Token
    pub access_token: String,
    /// Refresh Token
    pub refresh_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// Access Token 만료 시간 (초)
    pub expires_in: i64,
}

impl TokenResponse {
    fn new(pair: TokenPair, state: &AppState) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.sessions.access_ttl().num_seconds(),
        }
    }
}

/// 세션 작업 결과를 메트릭에 기록하고 API 결과로 변환.
pub(crate) fn observe<T>(operation: &'static str, result: GatewayResult<T>) -> ApiResult<T> {
    match result {
        Ok(value) => {
            record_session_event(operation, "success");
            Ok(value)
        }
        Err(e) => {
            record_session_event(operation, "failure");
            Err(gateway_error(e))
        }
    }
}

// =============================================================================
// 핸들러
// =============================================================================

/// 새 계정 생성.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "계정 생성", body = SignUpResponse),
        (status = 400, description = "로그인 길이 또는 비밀번호 강도 미달", body = ApiErrorResponse),
        (status = 409, description = "이미 사용 중인 로그인", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<SignUpResponse>)> {
    request.validate().map_err(validation_error)?;

    let account_id = observe(
        "signup",
        state.sessions.sign_up(&request.login, &request.password).await,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            id: account_id.as_uuid(),
        }),
    ))
}

/// 로그인 후 토큰 쌍 발급.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = TokenResponse),
        (status = 401, description = "로그인 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    request.validate().map_err(validation_error)?;

    let pair = observe(
        "login",
        state.sessions.login(&request.login, &request.password).await,
    )?;

    Ok(Json(TokenResponse::new(pair, &state)))
}

/// 토큰 쌍 갱신.
///
/// 성공하면 이전 refresh token은 더 이상 사용할 수 없습니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "새 토큰 쌍", body = TokenResponse),
        (status = 400, description = "파싱할 수 없는 토큰", body = ApiErrorResponse),
        (status = 401, description = "만료, 서명 불일치, 재사용된 refresh token", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    request.validate().map_err(validation_error)?;

    let current = TokenPair {
        access_token: request.access_token,
        refresh_token: request.refresh_token,
    };
    let pair = observe("refresh", state.sessions.refresh(&current).await)?;

    Ok(Json(TokenResponse::new(pair, &state)))
}

/// 세션 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}
