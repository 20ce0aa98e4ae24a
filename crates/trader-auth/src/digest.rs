//! refresh 토큰 content digest.

use sha2::{Digest, Sha256};

/// refresh 토큰 바이트의 SHA-256 digest.
///
/// 느린 해시의 입력 크기를 32바이트로 고정하면서도 저장 값을
/// 실제 토큰 바이트에 묶어 둡니다.
pub fn refresh_digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(refresh_digest("a.b.c"), refresh_digest("a.b.c"));
        assert_ne!(refresh_digest("a.b.c"), refresh_digest("a.b.d"));
    }

    #[test]
    fn test_digest_of_empty_token() {
        // SHA-256("")
        let expected: [u8; 32] = [
            0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
            0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
            0x78, 0x52, 0xb8, 0x55,
        ];
        assert_eq!(refresh_digest(""), expected);
    }
}
