//! 토큰 코덱 속성 기반 테스트
//!
//! - 발급 직후 검증하면 같은 식별자가 나온다
//! - 유효 기간이 지나면 서명은 유효해도 만료로 거부된다
//! - 임의 문자열은 패닉 없이 거부된다

mod common;

use chrono::Duration;
use proptest::prelude::*;
use std::sync::Arc;
use trader_core::{AccountId, GatewayError, ManualClock, TokenClass};

fn arb_account_id() -> impl Strategy<Value = AccountId> {
    any::<[u8; 16]>().prop_map(|bytes| AccountId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

fn arb_class() -> impl Strategy<Value = TokenClass> {
    prop_oneof![Just(TokenClass::Access), Just(TokenClass::Refresh)]
}

proptest! {
    #[test]
    fn issued_token_verifies_to_same_identity(
        id in arb_account_id(),
        class in arb_class(),
        ttl_secs in 1i64..(72 * 3600),
    ) {
        let codec = common::codec(Arc::new(ManualClock::starting_now()));
        let token = codec.issue(id, class, Duration::seconds(ttl_secs)).unwrap();

        let claims = codec.validate(&token, class).unwrap();
        prop_assert_eq!(claims.account_id().unwrap(), id);
        prop_assert_eq!(claims.typ, class);
    }

    #[test]
    fn token_expires_after_ttl(
        id in arb_account_id(),
        class in arb_class(),
        ttl_secs in 1i64..(72 * 3600),
        extra_secs in 0i64..3600,
    ) {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = common::codec(clock.clone());
        let token = codec.issue(id, class, Duration::seconds(ttl_secs)).unwrap();

        clock.advance(Duration::seconds(ttl_secs + extra_secs + 1));

        prop_assert!(codec.verify(&token, class).is_ok());
        prop_assert_eq!(codec.validate(&token, class), Err(GatewayError::Expired));
    }

    #[test]
    fn garbage_never_validates(input in "\\PC{0,200}") {
        let codec = common::codec(Arc::new(ManualClock::starting_now()));
        prop_assert!(codec.validate(&input, TokenClass::Access).is_err());
        prop_assert!(codec.validate(&input, TokenClass::Refresh).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected(id in arb_account_id(), flip in 0usize..64) {
        let codec = common::codec(Arc::new(ManualClock::starting_now()));
        let token = codec.issue(id, TokenClass::Access, Duration::minutes(15)).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = parts[1].clone().into_bytes();
        let idx = flip % payload.len();
        let mut tampered = payload.clone();
        tampered[idx] = if payload[idx] == b'A' { b'B' } else { b'A' };
        prop_assume!(tampered != payload);
        parts[1] = String::from_utf8(tampered).unwrap();

        prop_assert!(codec.validate(&parts.join("."), TokenClass::Access).is_err());
    }
}
