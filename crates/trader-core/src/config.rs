//! 설정 관리.
//!
//! 게이트웨이 설정을 정의하고 파일 + 환경 변수에서 로드합니다.
//!
//! # 환경 변수
//!
//! `GATEWAY` 접두사와 `__` 구분자를 사용합니다.
//!
//! - `GATEWAY__AUTH__ACCESS_SECRET`: access 토큰 서명 키 (32바이트 이상)
//! - `GATEWAY__AUTH__REFRESH_SECRET`: refresh 토큰 서명 키 (32바이트 이상)
//! - `GATEWAY__SERVER__PORT`: 리스닝 포트

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// 서명 키 최소 길이 (바이트).
pub const MIN_SECRET_LEN: usize = 32;

/// refresh 토큰 최대 유효 기간 (시간).
pub const MAX_REFRESH_TTL_HOURS: i64 = 24 * 365;

/// 게이트웨이 설정.
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 토큰 설정
    pub auth: AuthConfig,
    /// 비밀번호/digest 해시 설정
    #[serde(default)]
    pub hashing: HashingConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 토큰 설정.
///
/// access/refresh 토큰은 서로 다른 키로 서명합니다.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// access 토큰 서명 키
    #[serde(deserialize_with = "deserialize_secret")]
    pub access_secret: SecretString,
    /// refresh 토큰 서명 키
    #[serde(deserialize_with = "deserialize_secret")]
    pub refresh_secret: SecretString,
    /// access 토큰 유효 기간 (분)
    pub access_ttl_minutes: i64,
    /// refresh 토큰 유효 기간 (시간)
    pub refresh_ttl_hours: i64,
}

impl AuthConfig {
    /// 기본 유효 기간으로 생성.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        let access_secret: String = access_secret.into();
        let refresh_secret: String = refresh_secret.into();
        Self {
            access_secret: SecretString::new(access_secret.into()),
            refresh_secret: SecretString::new(refresh_secret.into()),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 72,
        }
    }

    /// access 토큰 유효 기간.
    ///
    /// 표현할 수 없는 값은 `validate()`가 거부하며, 여기서는 최대값으로 포화됩니다.
    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.access_ttl_minutes)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// refresh 토큰 유효 기간.
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.refresh_ttl_hours)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// 서명 키 길이와 유효 기간을 검증합니다.
    pub fn validate(&self) -> Result<(), String> {
        if self.access_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(format!(
                "auth.access_secret는 최소 {}바이트 이상이어야 합니다",
                MIN_SECRET_LEN
            ));
        }
        if self.refresh_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(format!(
                "auth.refresh_secret는 최소 {}바이트 이상이어야 합니다",
                MIN_SECRET_LEN
            ));
        }
        if self.access_ttl_minutes <= 0 || self.refresh_ttl_hours <= 0 {
            return Err("토큰 유효 기간은 0보다 커야 합니다".to_string());
        }
        if self.refresh_ttl_hours > MAX_REFRESH_TTL_HOURS {
            return Err(format!(
                "auth.refresh_ttl_hours는 {} 이하여야 합니다",
                MAX_REFRESH_TTL_HOURS
            ));
        }
        if chrono::Duration::try_minutes(self.access_ttl_minutes).is_none() {
            return Err("auth.access_ttl_minutes가 너무 큽니다".to_string());
        }
        if self.access_ttl() >= self.refresh_ttl() {
            return Err("access 토큰 유효 기간은 refresh 토큰보다 짧아야 합니다".to_string());
        }
        Ok(())
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| SecretString::new(s.into()))
}

/// Argon2 해시 파라미터.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashingConfig {
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬도
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl GatewayConfig {
    /// 파일(선택)과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("auth.access_ttl_minutes", 15)?
            .set_default("auth.refresh_ttl_hours", 72)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.auth.validate().map_err(config::ConfigError::Message)?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
