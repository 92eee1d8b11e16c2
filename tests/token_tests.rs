//! 会话令牌编解码测试
//!
//! 过期边界、篡改检测、角色快照语义。

use chrono::{Duration, Utc};
use dashboard_api::auth::token::{TokenCodec, TokenError};

mod common;
use common::create_test_config;

fn codec() -> TokenCodec {
    TokenCodec::from_config(&create_test_config()).expect("test codec")
}

#[test]
fn test_roundtrip_preserves_identity_and_roles() {
    let codec = codec();
    let authorities = vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()];

    let token = codec.issue("alice", authorities.clone()).unwrap();
    let claims = codec.verify(&token).unwrap();

    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.authorities, authorities);
}

#[test]
fn test_ttl_boundary_3600() {
    let codec = codec();
    let t0 = Utc::now();

    let token = codec
        .issue_at("alice", vec!["ROLE_USER".to_string()], t0)
        .unwrap();

    // TTL=3600：t0+3599 有效，t0+3601 过期
    let claims = codec.verify_at(&token, t0 + Duration::seconds(3599)).unwrap();
    assert_eq!(claims.authorities, vec!["ROLE_USER".to_string()]);

    assert_eq!(
        codec.verify_at(&token, t0 + Duration::seconds(3601)),
        Err(TokenError::Expired)
    );
}

#[test]
fn test_expired_token_stays_expired() {
    let codec = codec();
    let t0 = Utc::now() - Duration::seconds(7200);

    let token = codec
        .issue_at("alice", vec!["ROLE_USER".to_string()], t0)
        .unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_tampering_any_segment_is_detected() {
    let codec = codec();
    let token = codec
        .issue("alice", vec!["ROLE_USER".to_string()])
        .unwrap();

    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3);

    // 逐字节篡改 payload，每个变体都必须被拒绝
    // 替换字符翻转 6 位组的最高位，保证尾部字符的改动也落在有效位里
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let payload = parts[1].as_bytes();
    for i in 0..payload.len() {
        let mut mutated = payload.to_vec();
        let idx = ALPHABET
            .iter()
            .position(|&c| c == mutated[i])
            .expect("payload is base64url");
        mutated[i] = ALPHABET[idx ^ 32];
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            String::from_utf8(mutated).unwrap(),
            parts[2]
        );

        assert!(
            codec.verify(&tampered).is_err(),
            "mutated payload byte {} was accepted",
            i
        );
    }

    // 签名段篡改
    let forged = format!("{}.{}.{}x", parts[0], parts[1], parts[2]);
    assert!(codec.verify(&forged).is_err());
}

#[test]
fn test_roles_are_a_snapshot() {
    let codec = codec();

    // 两个令牌各自携带签发时的快照，互不影响
    let before = codec.issue("alice", vec!["ROLE_USER".to_string()]).unwrap();
    let after = codec
        .issue(
            "alice",
            vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()],
        )
        .unwrap();

    assert_eq!(
        codec.verify(&before).unwrap().authorities,
        vec!["ROLE_USER".to_string()]
    );
    assert_eq!(codec.verify(&after).unwrap().authorities.len(), 2);
}
