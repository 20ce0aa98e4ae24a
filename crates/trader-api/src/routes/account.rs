//! 계정 관리 endpoint.
//!
//! 모든 라우트는 `Authorization: Bearer <access token>` 헤더가 필요합니다.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{validation_error, ApiErrorResponse, ApiResult};
use crate::routes::auth::observe;
use crate::state::AppState;

/// 계정 삭제 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountDeletedResponse {
    /// 삭제된 계정 ID
    pub id: Uuid,
}

/// 비밀번호 변경 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// 계정 로그인
    #[validate(length(min = 1, message = "로그인이 필요합니다"))]
    pub login: String,
    /// 현재 비밀번호
    #[validate(length(min = 1, message = "현재 비밀번호가 필요합니다"))]
    pub current_password: String,
    /// 새 비밀번호
    #[validate(length(min = 1, message = "새 비밀번호가 필요합니다"))]
    pub new_password: String,
}

/// 인증된 계정 삭제.
///
/// 이미 발급된 access token은 만료될 때까지 서명 검증을 통과하지만
/// refresh는 더 이상 불가능합니다.
#[utoipa::path(
    delete,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "계정 삭제", body = AccountDeletedResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 404, description = "계정 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
pub async fn delete_account(
    AuthUser(account_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AccountDeletedResponse>> {
    observe("delete", state.sessions.delete_account(account_id).await)?;

    Ok(Json(AccountDeletedResponse {
        id: account_id.as_uuid(),
    }))
}

/// 비밀번호 변경.
///
/// 성공하면 기존 refresh token이 무효화되어 다시 로그인해야 합니다.
#[utoipa::path(
    put,
    path = "/api/v1/account/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "비밀번호 변경"),
        (status = 400, description = "새 비밀번호 강도 미달", body = ApiErrorResponse),
        (status = 401, description = "인증 실패 또는 현재 비밀번호 불일치", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
pub async fn change_password(
    AuthUser(account_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    request.validate().map_err(validation_error)?;

    observe(
        "password",
        state
            .sessions
            .change_password(
                account_id,
                &request.login,
                &request.current_password,
                &request.new_password,
            )
            .await,
    )?;

    Ok(StatusCode::NO_CONTENT)
}

/// 계정 라우터 생성.
pub fn account_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", delete(delete_account))
        .route("/password", put(change_password))
}
