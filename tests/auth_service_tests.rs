//! 认证服务集成测试
//!
//! 覆盖注册、登录、改名、改密码的完整语义，走内存凭据存储。

use dashboard_api::auth::session::Principal;
use dashboard_api::error::AppError;
use dashboard_api::models::user::RegisterRequest;

mod common;
use common::{create_auth_service, create_test_config};

fn register_request(username: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: password.to_string(),
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        authorities: None,
    }
}

fn principal_for(username: &str, authorities: &[&str]) -> Principal {
    Principal {
        username: username.to_string(),
        authorities: authorities.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_login_unknown_user_fails() {
    let (auth, _) = create_auth_service(&create_test_config());

    let result = auth.login("nobody", "whatever").await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_register_then_login() {
    let config = create_test_config();
    let (auth, codec) = create_auth_service(&config);

    let user = auth.register(register_request("alice", "pw1")).await.unwrap();
    assert_eq!(user.username, "alice");

    // 正确密码成功，令牌解码回默认角色快照
    let token = auth.login("alice", "pw1").await.unwrap();
    let claims = codec.verify(&token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.authorities, vec!["ROLE_USER".to_string()]);

    // 错误密码与未知用户返回同一个错误
    let wrong = auth.login("alice", "pw2").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_register_duplicate_username_fails() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();

    // 换密码、换资料都救不了重名
    let result = auth.register(register_request("alice", "other-password")).await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_register_explicit_authorities() {
    let config = create_test_config();
    let (auth, codec) = create_auth_service(&config);

    let mut req = register_request("root", "pw1");
    req.authorities = Some(vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()]);
    auth.register(req).await.unwrap();

    let token = auth.login("root", "pw1").await.unwrap();
    let claims = codec.verify(&token).unwrap();
    assert!(claims.authorities.contains(&"ROLE_ADMIN".to_string()));
    assert!(claims.authorities.contains(&"ROLE_USER".to_string()));
}

#[tokio::test]
async fn test_change_password_forces_new_credential() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();
    auth.login("alice", "pw1").await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    auth.change_password(&principal, "pw2").await.unwrap();

    // 旧密码失效，新密码生效
    assert!(matches!(
        auth.login("alice", "pw1").await,
        Err(AppError::InvalidCredentials)
    ));
    auth.login("alice", "pw2").await.unwrap();
}

#[tokio::test]
async fn test_change_username_remints_token() {
    let config = create_test_config();
    let (auth, codec) = create_auth_service(&config);

    auth.register(register_request("alice", "pw1")).await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    let result = auth.change_username(&principal, "alicia").await.unwrap();

    assert_eq!(result.user.username, "alicia");

    // 新令牌绑定新身份
    let token = result.token.expect("token should be re-minted");
    let claims = codec.verify(&token).unwrap();
    assert_eq!(claims.sub, "alicia");

    // 旧身份登录不再成立，新身份正常
    assert!(matches!(
        auth.login("alice", "pw1").await,
        Err(AppError::InvalidCredentials)
    ));
    auth.login("alicia", "pw1").await.unwrap();
}

#[tokio::test]
async fn test_change_username_to_same_name_does_not_remint() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    let result = auth.change_username(&principal, "alice").await.unwrap();

    assert_eq!(result.user.username, "alice");
    assert!(result.token.is_none());
}

#[tokio::test]
async fn test_change_username_taken_by_other_fails() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();
    auth.register(register_request("bob", "pw2")).await.unwrap();

    let principal = principal_for("bob", &["ROLE_USER"]);
    let result = auth.change_username(&principal, "alice").await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_change_username_blank_rejected() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    let result = auth.change_username(&principal, "   ").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_stale_principal_after_rename_is_unauthorized() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    auth.change_username(&principal, "alicia").await.unwrap();

    // 改名后旧令牌派生的身份查不到凭据，按未认证处理
    let result = auth.me(&principal).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_update_profile_keeps_session_intact() {
    let config = create_test_config();
    let (auth, _) = create_auth_service(&config);

    auth.register(register_request("alice", "pw1")).await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    let updated = auth
        .update_profile(
            &principal,
            dashboard_api::models::user::UpdateProfileRequest {
                first_name: Some("Alice".to_string()),
                last_name: Some("Smith".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name.as_deref(), Some("Alice"));
    assert_eq!(updated.last_name.as_deref(), Some("Smith"));

    // 资料变更不影响登录
    auth.login("alice", "pw1").await.unwrap();
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let (auth, _) = create_auth_service(&create_test_config());

    auth.register(register_request("alice", "pw1")).await.unwrap();

    let principal = principal_for("alice", &["ROLE_USER"]);
    let user = auth.me(&principal).await.unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.profile_picture.is_some());
}
