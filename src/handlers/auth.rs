//! 认证相关的 HTTP 处理器

use crate::{
    auth::cookie::{clear_session_cookie, session_cookie},
    auth::session::Principal,
    error::AppError,
    middleware::AppState,
    models::auth::LoginRequest,
    models::authority::ROLE_USER,
    models::user::RegisterRequest,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 登录
///
/// 成功时令牌通过会话 Cookie 下发，响应体为空。
/// 失败统一 401，不区分用户名错误还是密码错误。
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = state.auth_service.login(&req.username, &req.password).await?;

    let cookie = session_cookie(&token, state.token_codec.ttl_secs());

    Ok(([(header::SET_COOKIE, cookie)], StatusCode::OK))
}

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state.auth_service.register(req).await?;

    Ok(Json(json!({
        "message": "Registration Successful",
        "user": user
    })))
}

/// 登出
///
/// 服务端不跟踪令牌，登出就是让客户端清掉 Cookie。
pub async fn logout(principal: Principal) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({"message": "logged out"})),
    ))
}

/// 获取当前用户信息
pub async fn me(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let user = state.auth_service.me(&principal).await?;

    Ok(Json(user))
}
