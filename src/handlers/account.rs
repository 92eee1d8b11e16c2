//! 账号维护的 HTTP 处理器
//! 姓名、用户名、密码、头像变更

use crate::{
    auth::cookie::{clear_session_cookie, session_cookie},
    auth::session::Principal,
    error::AppError,
    middleware::AppState,
    models::authority::ROLE_USER,
    models::user::{
        ChangePasswordRequest, ChangeProfilePictureRequest, ChangeUsernameRequest,
        UpdateProfileRequest,
    },
};
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 更新姓名
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    req.validate()?;

    let user = state.auth_service.update_profile(&principal, req).await?;

    Ok(Json(user))
}

/// 改用户名
///
/// 名字真的变了时会换发新令牌：新的会话 Cookie 跟着响应回去，
/// 其他客户端手里的旧令牌保持原样直到自然过期。
pub async fn change_username(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<ChangeUsernameRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    req.validate()?;

    let result = state
        .auth_service
        .change_username(&principal, &req.username)
        .await?;

    let mut response = Json(result.user).into_response();
    if let Some(token) = result.token {
        let cookie = session_cookie(&token, state.token_codec.ttl_secs());
        let value = HeaderValue::from_str(&cookie)
            .map_err(|_| AppError::internal_error("invalid session cookie"))?;
        response.headers_mut().insert(header::SET_COOKIE, value);
    }

    Ok(response)
}

/// 改密码
///
/// 成功后清掉会话 Cookie，让客户端重新登录。
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    req.validate()?;

    state
        .auth_service
        .change_password(&principal, &req.password)
        .await?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({"message": "Successful"})),
    ))
}

/// 改头像
pub async fn change_profile_picture(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<ChangeProfilePictureRequest>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    req.validate()?;

    state
        .auth_service
        .change_profile_picture(&principal, &req.profile_picture)
        .await?;

    Ok(Json(json!({"message": "Successful"})))
}
