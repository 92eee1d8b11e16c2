//! 认证 API 集成测试
//!
//! 整条 HTTP 链路：会话中间件、身份提取、权限门、Cookie 传输。
//! 凭据存储是内存实现，不需要数据库。

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app_state, create_test_config};

fn test_app() -> Router {
    dashboard_api::routes::create_router(create_test_app_state(create_test_config()))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// 注册并登录，返回会话令牌
async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({"username": username, "password": password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login(app, username, password).await
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"username": username, "password": password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 令牌走 Set-Cookie 下发，响应体为空
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set session cookie")
        .to_str()
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    cookie
        .split(';')
        .next()
        .unwrap()
        .strip_prefix("TOKEN=")
        .expect("cookie must carry the token")
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_login_success_sets_cookie_and_empty_body() {
    let app = test_app();

    let _token = register_and_login(&app, "alice", "TestPass123").await;
}

#[tokio::test]
async fn test_login_wrong_password_is_generic_401() {
    let app = test_app();
    register_and_login(&app, "alice", "TestPass123").await;

    for (username, password) in [("alice", "WrongPassword"), ("nobody", "TestPass123")] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/login",
                json!({"username": username, "password": password}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // 错误信息不区分用户名还是密码错了
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = test_app();
    register_and_login(&app, "alice", "TestPass123").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({"username": "alice", "password": "different"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "alice");
}

#[tokio::test]
async fn test_me_with_cookie_token() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::COOKIE, format!("TOKEN={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_token_is_anonymous_not_hard_rejected() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "TestPass123").await;

    // 篡改令牌：中间件静默忽略，请求按匿名继续，
    // 到了需要角色的端点才收 401
    let tampered = format!("{}x", token);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", tampered))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 同样的坏令牌打公开端点完全无感
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::AUTHORIZATION, format!("Bearer {}", tampered))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_role_gate_rejects_missing_role() {
    let app = test_app();

    // 只有 ROLE_ADMIN 的账号：有效令牌，但 USER 门不放行
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "username": "opsbot",
                "password": "TestPass123",
                "authorities": ["ROLE_ADMIN"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let token = login(&app, "opsbot", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/logout")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // ROLE_ADMIN 不隐含 ROLE_USER
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/logout")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("TOKEN=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_change_username_rotates_cookie() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "TestPass123").await;

    let mut request = json_request(
        "PUT",
        "/api/v1/account/username",
        json!({"username": "alicia"}),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 改名换发新令牌
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("renaming must rotate the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    let new_token = cookie
        .split(';')
        .next()
        .unwrap()
        .strip_prefix("TOKEN=")
        .unwrap()
        .to_string();
    assert_ne!(new_token, token);

    let json = body_json(response).await;
    assert_eq!(json["username"], "alicia");

    // 新令牌以新身份生效
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", new_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "alicia");
}

#[tokio::test]
async fn test_change_password_clears_cookie_and_old_password_dies() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "TestPass123").await;

    let mut request = json_request(
        "PUT",
        "/api/v1/account/password",
        json!({"password": "NewPass456"}),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 改密码指示客户端丢弃令牌
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));

    // 旧密码登录失败，新密码成功
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"username": "alice", "password": "TestPass123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    login(&app, "alice", "NewPass456").await;
}
