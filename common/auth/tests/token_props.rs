use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common_auth::codec::{decode_segment, encode_segment, join, split};
use common_auth::{
    AuthError, ClaimSet, Clock, ManualClock, RejectionKind, SharedSecret, TokenConfig,
    TokenIssuer, TokenVerifier,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const NOW: i64 = 1_700_000_000;

fn pair(secret: &[u8], clock: &ManualClock) -> (TokenIssuer, TokenVerifier) {
    let config = TokenConfig::new(SharedSecret::from_bytes(secret).unwrap());
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    (
        TokenIssuer::with_clock(config.clone(), shared.clone()),
        TokenVerifier::with_clock(config, shared),
    )
}

fn claim_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,6}", 0..4).prop_map(|items| json!(items)),
    ]
}

fn claim_set() -> impl Strategy<Value = ClaimSet> {
    prop::collection::vec(("[a-zA-Z][a-zA-Z0-9_]{0,7}", claim_value()), 0..6).prop_map(
        |entries| {
            entries
                .into_iter()
                .filter(|(key, _)| key != "exp")
                .fold(ClaimSet::new(), |claims, (key, value)| claims.with(key, value))
        },
    )
}

proptest! {
    // verify(issue(C, t)) yields C plus exp for every instant up to and including exp.
    #[test]
    fn issued_tokens_round_trip(
        claims in claim_set(),
        (ttl, elapsed) in (1i64..100_000).prop_flat_map(|ttl| (Just(ttl), 0..=ttl)),
    ) {
        let clock = ManualClock::at_unix(NOW);
        let (issuer, verifier) = pair(b"secret", &clock);
        let token = issuer.issue(claims.clone(), ttl).unwrap();

        clock.advance_secs(elapsed);
        let verified = verifier.verify(&token).unwrap();
        prop_assert_eq!(verified.expires_at(), Some(NOW + ttl));
        prop_assert_eq!(verified.len(), claims.len() + 1);
        for (key, value) in claims.iter() {
            prop_assert_eq!(verified.get(key), Some(value));
        }
    }

    #[test]
    fn tokens_expire_after_exp(ttl in 1i64..100_000, overshoot in 1i64..100_000) {
        let clock = ManualClock::at_unix(NOW);
        let (issuer, verifier) = pair(b"secret", &clock);
        let token = issuer.issue(ClaimSet::new().with("hello", "world"), ttl).unwrap();

        clock.advance_secs(ttl + overshoot);
        let err = verifier.verify(&token).unwrap_err();
        prop_assert_eq!(err.kind(), Some(RejectionKind::Expired));
    }

    // Flipping any payload byte and re-encoding it never gets past the MAC.
    #[test]
    fn single_byte_payload_tamper_is_bad_signature(
        claims in claim_set(),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let clock = ManualClock::at_unix(NOW);
        let (issuer, verifier) = pair(b"secret", &clock);
        let token = issuer.issue(claims, 60).unwrap();

        let parts = split(&token).unwrap();
        let mut payload = decode_segment(parts.payload_b64).unwrap();
        let at = index.index(payload.len());
        payload[at] ^= mask;
        let tampered = join(parts.header_b64, &encode_segment(&payload), parts.signature_b64);

        let err = verifier.verify(&tampered).unwrap_err();
        prop_assert!(matches!(err, AuthError::BadSignature), "got {err:?}");
    }

    // Any single-character edit of the payload segment, inside the base64url
    // alphabet or not, fails at the MAC.
    #[test]
    fn single_char_payload_segment_edit_is_bad_signature(
        claims in claim_set(),
        index in any::<prop::sample::Index>(),
        replacement in "[ -~]",
    ) {
        let clock = ManualClock::at_unix(NOW);
        let (issuer, verifier) = pair(b"secret", &clock);
        let token = issuer.issue(claims, 60).unwrap();

        let parts = split(&token).unwrap();
        let segment: Vec<char> = parts.payload_b64.chars().collect();
        let at = index.index(segment.len());
        let with = replacement.chars().next().unwrap();
        prop_assume!(with != '.' && with != segment[at]);

        let mut edited = segment;
        edited[at] = with;
        let edited: String = edited.into_iter().collect();
        let tampered = join(parts.header_b64, &edited, parts.signature_b64);

        let err = verifier.verify(&tampered).unwrap_err();
        prop_assert!(matches!(err, AuthError::BadSignature), "got {err:?}");
    }

    #[test]
    fn other_secret_is_bad_signature(
        signing in prop::collection::vec(any::<u8>(), 1..48),
        checking in prop::collection::vec(any::<u8>(), 1..48),
    ) {
        prop_assume!(signing != checking);
        let clock = ManualClock::at_unix(NOW);
        let (issuer, _) = pair(&signing, &clock);
        let (_, verifier) = pair(&checking, &clock);
        let token = issuer.issue(ClaimSet::new().with("userId", 123), 60).unwrap();

        let err = verifier.verify(&token).unwrap_err();
        prop_assert!(matches!(err, AuthError::BadSignature), "got {err:?}");
    }

    #[test]
    fn wrong_segment_count_is_malformed(segments in prop::collection::vec("[A-Za-z0-9_-]{0,8}", 0..7)) {
        prop_assume!(segments.len() != 3);
        let clock = ManualClock::at_unix(NOW);
        let (_, verifier) = pair(b"secret", &clock);

        let err = verifier.verify(&segments.join(".")).unwrap_err();
        prop_assert!(matches!(err, AuthError::MalformedToken(_)), "got {err:?}");
    }

    #[test]
    fn arbitrary_input_is_rejected_without_panic(input in "\\PC{0,64}") {
        let clock = ManualClock::at_unix(NOW);
        let (_, verifier) = pair(b"secret", &clock);

        let err = verifier.verify(&input).unwrap_err();
        prop_assert!(err.kind().is_some());
    }
}

#[test]
fn tampered_vip_claims_from_source_are_rejected() {
    let clock = ManualClock::at_unix(NOW);
    let (issuer, verifier) = pair(b"secret", &clock);
    let claims = ClaimSet::new()
        .with("vip", false)
        .with("read", json!(["incomes"]))
        .with("write", json!([]))
        .with("userId", 123);
    let token = issuer.issue(claims, 15).unwrap();

    let trusted = verifier.verify(&token).unwrap();
    assert_eq!(trusted.get("userId"), Some(&json!(123)));
    assert_eq!(trusted.get("vip"), Some(&json!(false)));

    let parts = split(&token).unwrap();
    let mut payload: Value = serde_json::from_slice(&parts.payload().unwrap()).unwrap();
    payload["vip"] = json!(true);
    payload["write"] = json!(["users", "payments", "ALL"]);
    payload["userId"] = json!(1);
    let edited = serde_json::to_vec(&payload).unwrap();

    // Re-encoded the way a client would: unpadded base64url, or the standard
    // padded alphabet as generic base64 helpers produce.
    for segment in [encode_segment(&edited), STANDARD.encode(&edited)] {
        let tampered = join(parts.header_b64, &segment, parts.signature_b64);
        let err = verifier.verify(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::BadSignature), "{segment}: {err:?}");
    }
}
