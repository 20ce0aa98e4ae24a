//! Axum용 Bearer 인증 추출기.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::debug;

use trader_core::{AccountId, GatewayError};

use crate::error::{gateway_error, ApiError};
use crate::metrics::record_auth_failure;
use crate::state::AppState;

/// 인증된 계정 추출기.
///
/// `Authorization: Bearer <access token>` 헤더를 검증하고 계정 식별자를 꺼냅니다.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AccountId);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| reject(GatewayError::MalformedHeader))?,
            ),
            None => None,
        };

        state.guard.authenticate(header).map(AuthUser).map_err(reject)
    }
}

fn reject(err: GatewayError) -> ApiError {
    debug!(code = err.code(), "Request authentication failed");
    record_auth_failure(err.code());
    gateway_error(err)
}
