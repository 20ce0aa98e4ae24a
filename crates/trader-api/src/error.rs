//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! [`GatewayError`]는 [`ErrorKind`]에 따라 HTTP 상태 코드로 변환됩니다.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use trader_core::{ErrorKind, GatewayError};

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "INSUFFICIENT_FUNDS",
///   "message": "잔고가 부족합니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "TOKEN_EXPIRED", "INSUFFICIENT_FUNDS")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// # Example
    ///
    /// ```
    /// use trader_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("INVALID_INPUT", "amount must be positive");
    /// assert_eq!(error.code(), "INVALID_INPUT");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 에러 타입.
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
///
/// # Example
///
/// ```ignore
/// async fn balance(
///     AuthUser(account_id): AuthUser,
///     State(state): State<Arc<AppState>>,
/// ) -> ApiResult<Json<BalanceResponse>> {
///     let amount = state.balances.balance(account_id).await.map_err(gateway_error)?;
///     Ok(Json(BalanceResponse { id: account_id.as_uuid(), amount }))
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiError>;

/// 게이트웨이 에러의 HTTP 상태 코드.
///
/// 인증 헤더 문제는 입력 에러이지만 401로 응답합니다.
pub fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::MissingHeader
        | GatewayError::MalformedHeader
        | GatewayError::MalformedClaims => StatusCode::UNAUTHORIZED,
        GatewayError::InsufficientFunds | GatewayError::NotEnoughMoney => {
            StatusCode::PAYMENT_REQUIRED
        }
        GatewayError::LoginAlreadyExists => StatusCode::CONFLICT,
        GatewayError::AccountNotFound => StatusCode::NOT_FOUND,
        GatewayError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        other => match other.kind() {
            ErrorKind::Input => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Business => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Collaborator => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// 게이트웨이 에러를 API 에러 응답으로 변환.
///
/// 협력자 장애의 상세 메시지는 로그에만 남기고 응답에는 일반 메시지를 사용합니다.
pub fn gateway_error(err: GatewayError) -> ApiError {
    let status = status_for(&err);
    let message = if err.kind() == ErrorKind::Collaborator {
        error!(code = err.code(), error = %err, "Collaborator failure");
        "일시적인 서버 오류입니다".to_string()
    } else {
        err.to_string()
    };

    (status, Json(ApiErrorResponse::new(err.code(), message)))
}

/// 요청 본문 검증 실패를 API 에러 응답으로 변환.
///
/// `details`에는 필드별 메시지 목록이 담깁니다.
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut fields = serde_json::Map::new();
    let mut messages = Vec::new();

    for (field, errors) in errors.field_errors() {
        let field_messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
            })
            .collect();
        messages.extend(field_messages.iter().cloned());
        fields.insert(field.to_string(), Value::from(field_messages));
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "INVALID_INPUT",
            messages.join(", "),
            Value::Object(fields),
        )),
    )
}
