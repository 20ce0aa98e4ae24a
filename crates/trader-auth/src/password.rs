//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 느린 해시. 비밀번호와 refresh 토큰 digest 모두 이 해시로 저장합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use trader_core::{GatewayError, GatewayResult, HashingConfig};

/// 로그인 최소 길이.
pub const MIN_LOGIN_LEN: usize = 5;
/// 로그인 최대 길이.
pub const MAX_LOGIN_LEN: usize = 20;

/// 느린 해시 primitive.
pub trait SecretHasher: Send + Sync {
    /// 솔트를 포함한 PHC 형식 해시 생성.
    fn hash(&self, secret: &[u8]) -> GatewayResult<String>;

    /// 저장된 해시와 비교. 해시 형식이 잘못된 경우에도 `false`.
    fn verify(&self, hash: &str, secret: &[u8]) -> bool;
}

/// Argon2id 해셔.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// 설정의 비용 파라미터로 생성.
    ///
    /// # Errors
    ///
    /// Argon2가 허용하지 않는 파라미터이면 `GatewayError::Hashing`.
    pub fn new(config: &HashingConfig) -> GatewayResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| GatewayError::Hashing(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &[u8]) -> GatewayResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(secret, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| GatewayError::Hashing(e.to_string()))
    }

    fn verify(&self, hash: &str, secret: &[u8]) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        // 비용 파라미터는 해시 문자열에 기록된 값을 사용
        self.argon2().verify_password(secret, &parsed).is_ok()
    }
}

/// 로그인 형식 검증.
///
/// 길이는 문자 수 기준 5~20자입니다.
pub fn validate_login(login: &str) -> GatewayResult<()> {
    let len = login.chars().count();
    if !(MIN_LOGIN_LEN..=MAX_LOGIN_LEN).contains(&len) {
        return Err(GatewayError::InvalidInput(format!(
            "로그인은 {}~{}자여야 합니다",
            MIN_LOGIN_LEN, MAX_LOGIN_LEN
        )));
    }
    Ok(())
}

/// 비밀번호 강도 검증.
///
/// # 요구사항
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> GatewayResult<()> {
    let reject = |msg: &str| Err(GatewayError::InvalidInput(msg.to_string()));

    if password.chars().count() < 8 {
        return reject("비밀번호는 최소 8자 이상이어야 합니다");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return reject("비밀번호에 최소 1개의 숫자가 포함되어야 합니다");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return reject("비밀번호에 최소 1개의 영문자가 포함되어야 합니다");
    }

    Ok(())
}
