//! 계정 식별자와 자격증명.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 계정 고유 식별자.
///
/// 토큰 클레임에는 하이픈 포함 UUID 문자열로 기록됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// 새로운 임의 식별자 생성.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 기존 UUID로부터 생성.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// 내부 UUID 반환.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// 자격증명 저장소가 보관하는 로그인 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// 계정 식별자
    pub account_id: AccountId,
    /// 로그인 이름
    pub login: String,
    /// PHC 형식 비밀번호 해시
    pub password_hash: String,
}
