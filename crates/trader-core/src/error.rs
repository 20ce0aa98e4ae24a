//! 게이트웨이 에러 타입.
//!
//! 세션 발급, 요청 인증, 잔고 가드에서 발생하는 모든 에러를 정의합니다.
//! 각 에러는 [`ErrorKind`]로 분류되어 호출자가 재로그인, 사용자 메시지,
//! 장애 처리 중 무엇을 해야 하는지 판단할 수 있습니다.

use thiserror::Error;

/// 에러 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 잘못된 헤더, 토큰 형식, 식별자 등 입력 에러 (재시도 무의미)
    Input,
    /// 서명, 만료, 식별자 불일치, digest 불일치 등 인증 에러 (재로그인 필요)
    Authentication,
    /// 잔고 부족, 중복 로그인, 계정 없음 등 비즈니스 규칙 에러
    Business,
    /// 저장소/해시/서명 협력자 장애
    Collaborator,
}

/// 협력자 저장소 에러.
///
/// 전송 계층의 상태 메시지 대신 구조화된 코드로 비즈니스 결과를 전달합니다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// 레코드 없음
    #[error("레코드를 찾을 수 없습니다")]
    NotFound,

    /// 이미 존재하는 레코드 (로그인 중복 등)
    #[error("이미 존재하는 레코드입니다")]
    Conflict,

    /// 원장의 최종 잔고 검사 실패
    #[error("잔고가 부족합니다")]
    NotEnoughMoney,

    /// 저장소 연결 또는 호출 실패
    #[error("저장소 호출 실패: {0}")]
    Unavailable(String),
}

/// 게이트웨이 핵심 에러.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    // ===== 입력 에러 =====
    /// Authorization 헤더 없음
    #[error("인증 헤더가 필요합니다")]
    MissingHeader,

    /// Bearer 스킴이 아닌 Authorization 헤더
    #[error("잘못된 Authorization 헤더 형식")]
    MalformedHeader,

    /// 식별자 클레임 누락 또는 파싱 실패
    #[error("토큰의 식별자 클레임이 올바르지 않습니다")]
    MalformedClaims,

    /// 파싱할 수 없는 토큰
    #[error("잘못된 토큰 형식")]
    Malformed,

    /// 요청 값 검증 실패
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    // ===== 인증 에러 =====
    /// 알고리즘 또는 서명 키 검증 실패
    #[error("토큰 서명이 유효하지 않습니다")]
    InvalidSignature,

    /// 만료된 토큰
    #[error("토큰이 만료되었습니다")]
    Expired,

    /// 기대한 토큰 종류(access/refresh)가 아님
    #[error("토큰 종류가 올바르지 않습니다")]
    WrongClass,

    /// 요청 인증에 사용된 토큰이 유효하지 않음
    #[error("유효하지 않은 토큰")]
    InvalidToken,

    /// access/refresh 토큰의 식별자가 서로 다름
    #[error("access 토큰과 refresh 토큰의 사용자 ID가 다릅니다")]
    IdentityMismatch,

    /// 저장된 digest와 refresh 토큰 불일치 (재사용 포함)
    #[error("refresh 토큰이 유효하지 않습니다")]
    RefreshInvalid,

    /// 로그인 없음 또는 비밀번호 불일치 (의도적으로 구분하지 않음)
    #[error("로그인 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    // ===== 비즈니스 에러 =====
    /// 잔고 가드의 사전 검사 실패
    #[error("잔고가 부족합니다")]
    InsufficientFunds,

    /// 원장의 최종 검사 실패
    #[error("원장에서 잔고 부족으로 거부되었습니다")]
    NotEnoughMoney,

    /// 이미 사용 중인 로그인
    #[error("이미 존재하는 로그인입니다")]
    LoginAlreadyExists,

    /// 계정 없음
    #[error("계정을 찾을 수 없습니다")]
    AccountNotFound,

    // ===== 협력자 에러 =====
    /// 저장소 장애
    #[error("저장소 에러: {0}")]
    Store(String),

    /// 느린 해시 처리 실패
    #[error("해시 처리 실패: {0}")]
    Hashing(String),

    /// 토큰 서명 실패
    #[error("토큰 서명 실패: {0}")]
    Signing(String),
}

/// 게이트웨이 작업을 위한 Result 타입.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// 에러 분류를 반환합니다.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::MissingHeader
            | GatewayError::MalformedHeader
            | GatewayError::MalformedClaims
            | GatewayError::Malformed
            | GatewayError::InvalidInput(_) => ErrorKind::Input,
            GatewayError::InvalidSignature
            | GatewayError::Expired
            | GatewayError::WrongClass
            | GatewayError::InvalidToken
            | GatewayError::IdentityMismatch
            | GatewayError::RefreshInvalid
            | GatewayError::InvalidCredentials => ErrorKind::Authentication,
            GatewayError::InsufficientFunds
            | GatewayError::NotEnoughMoney
            | GatewayError::LoginAlreadyExists
            | GatewayError::AccountNotFound => ErrorKind::Business,
            GatewayError::Store(_) | GatewayError::Hashing(_) | GatewayError::Signing(_) => {
                ErrorKind::Collaborator
            }
        }
    }

    /// 응답 본문에 사용하는 고정 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::MissingHeader => "MISSING_HEADER",
            GatewayError::MalformedHeader => "MALFORMED_HEADER",
            GatewayError::MalformedClaims => "MALFORMED_CLAIMS",
            GatewayError::Malformed => "MALFORMED_TOKEN",
            GatewayError::InvalidInput(_) => "INVALID_INPUT",
            GatewayError::InvalidSignature => "INVALID_SIGNATURE",
            GatewayError::Expired => "TOKEN_EXPIRED",
            GatewayError::WrongClass => "WRONG_TOKEN_CLASS",
            GatewayError::InvalidToken => "INVALID_TOKEN",
            GatewayError::IdentityMismatch => "IDENTITY_MISMATCH",
            GatewayError::RefreshInvalid => "REFRESH_INVALID",
            GatewayError::InvalidCredentials => "INVALID_CREDENTIALS",
            GatewayError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            GatewayError::NotEnoughMoney => "NOT_ENOUGH_MONEY",
            GatewayError::LoginAlreadyExists => "LOGIN_ALREADY_EXIST",
            GatewayError::AccountNotFound => "USER_DOESNT_EXISTS",
            GatewayError::Store(_) => "STORE_UNAVAILABLE",
            GatewayError::Hashing(_) => "HASHING_FAILED",
            GatewayError::Signing(_) => "SIGNING_FAILED",
        }
    }

    /// 클라이언트가 다시 로그인해야 하는 에러인지 확인합니다.
    pub fn requires_relogin(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}

/// 호출 위치에서 별도 매핑이 없을 때의 기본 변환.
impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => GatewayError::AccountNotFound,
            StoreError::Conflict => GatewayError::LoginAlreadyExists,
            StoreError::NotEnoughMoney => GatewayError::NotEnoughMoney,
            StoreError::Unavailable(msg) => GatewayError::Store(msg),
        }
    }
}
