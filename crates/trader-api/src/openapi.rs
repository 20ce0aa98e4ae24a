//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성하고
//! `/api-docs/openapi.json` 경로로 제공합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ApiErrorResponse;
use crate::routes::{
    AccountDeletedResponse, AmountRequest, BalanceResponse, ChangePasswordRequest,
    CredentialsRequest, HealthResponse, LoginRequest, RefreshRequest, SignUpResponse,
    TokenResponse,
};

/// Trader Gateway API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trader Gateway API",
        description = r#"
# 트레이딩 게이트웨이 REST API

계정 세션과 잔고 변경을 위한 REST API입니다.

## 인증

`/api/v1/account`와 `/api/v1/balance` 엔드포인트는 Bearer 토큰 인증이 필요합니다.
`Authorization: Bearer <access token>` 헤더를 포함하세요.
Access token이 만료되면 `/api/v1/auth/refresh`로 새 토큰 쌍을 받으세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "세션 - 가입, 로그인, 토큰 갱신"),
        (name = "account", description = "계정 - 삭제 및 비밀번호 변경"),
        (name = "balance", description = "잔고 - 조회, 입금, 출금")
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,

            // ===== Health =====
            HealthResponse,

            // ===== Auth =====
            CredentialsRequest,
            LoginRequest,
            RefreshRequest,
            SignUpResponse,
            TokenResponse,

            // ===== Account =====
            AccountDeletedResponse,
            ChangePasswordRequest,

            // ===== Balance =====
            AmountRequest,
            BalanceResponse,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::sign_up,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::account::delete_account,
        crate::routes::account::change_password,
        crate::routes::balance::get_balance,
        crate::routes::balance::deposit,
        crate::routes::balance::withdraw,
    )
)]
pub struct ApiDoc;

/// Bearer 토큰 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI JSON 라우터 생성.
///
/// `/api-docs/openapi.json` 경로에 스펙을 마운트합니다.
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
