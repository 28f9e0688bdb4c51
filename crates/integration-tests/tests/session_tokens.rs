//! Integration tests for token issuance and verification.
//!
//! The issuer takes its key at construction, so these tests run with a
//! deterministic key and no environment access.

use secrecy::SecretString;

use juniper_api::services::auth::TokenIssuer;
use juniper_api::services::auth::tokens::{
    ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS, RESET_TOKEN_TTL_SECS, TokenError,
};
use juniper_core::UserId;

const TEST_KEY: &str = "integration-test-key-0123456789abcdef-0123456789";
const OTHER_KEY: &str = "integration-test-key-fedcba9876543210-fedcba9876";

fn issuer() -> TokenIssuer {
    TokenIssuer::new(&SecretString::from(TEST_KEY))
}

#[test]
fn test_tokens_bind_to_the_issuing_user() {
    let issuer = issuer();

    for raw_id in [1, 42, 9_000] {
        let user = UserId::new(raw_id);
        let token = issuer.issue_access(user).expect("issue");
        let claims = issuer.verify(&token).expect("verify");
        assert_eq!(claims.user_id(), user);
    }
}

#[test]
fn test_all_three_kinds_verify_with_the_same_key() {
    // Access, refresh, and reset tokens are structurally identical; only the
    // lifetimes differ.
    let issuer = issuer();
    let user = UserId::new(7);

    let access = issuer.issue_access(user).expect("access");
    let refresh = issuer.issue_refresh(user).expect("refresh");
    let reset = issuer.issue_reset(user).expect("reset");

    let access = issuer.verify(&access).expect("verify access");
    let refresh = issuer.verify(&refresh).expect("verify refresh");
    let reset = issuer.verify(&reset).expect("verify reset");

    assert_eq!(access.exp - access.iat, ACCESS_TOKEN_TTL_SECS);
    assert_eq!(refresh.exp - refresh.iat, REFRESH_TOKEN_TTL_SECS);
    assert_eq!(reset.exp - reset.iat, RESET_TOKEN_TTL_SECS);
}

#[test]
fn test_verification_is_key_bound() {
    let token = issuer().issue_refresh(UserId::new(1)).expect("issue");

    let other = TokenIssuer::new(&SecretString::from(OTHER_KEY));
    assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
}

#[test]
fn test_tampered_token_is_rejected() {
    let issuer = issuer();
    let token = issuer.issue_access(UserId::new(1)).expect("issue");

    // Flip a character in the payload segment
    let mut tampered = token.clone().into_bytes();
    let payload_start = token.find('.').expect("jwt has segments") + 1;
    let byte = tampered.get_mut(payload_start).expect("payload byte");
    *byte = if *byte == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).expect("still utf8");

    assert!(matches!(issuer.verify(&tampered), Err(TokenError::Invalid)));
}

#[test]
fn test_verification_is_repeatable() {
    // Verify is a pure function of token + key + clock: repeated calls agree
    // and issuance state is not consulted.
    let issuer = issuer();
    let token = issuer.issue_access(UserId::new(11)).expect("issue");

    let first = issuer.verify(&token).expect("first verify");
    let second = issuer.verify(&token).expect("second verify");

    assert_eq!(first.sub, second.sub);
    assert_eq!(first.iat, second.iat);
    assert_eq!(first.exp, second.exp);
}
