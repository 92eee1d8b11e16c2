//! 会话中间件与请求身份
//!
//! 每个请求进入时提取并校验会话令牌，把 Principal 挂到请求扩展上。
//! 无效令牌按匿名处理而不是直接拒绝：后续的权限检查自然会把匿名
//! 请求挡在需要角色的端点之外。这是有意的设计选择，不是疏漏。

use crate::{
    auth::cookie::SESSION_COOKIE,
    auth::token::TokenCodec,
    error::AppError,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 请求身份（附加到请求扩展）
///
/// 由一个有效令牌派生，随请求结束丢弃，从不落库。
/// 权限集合是令牌签发时的快照。
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<String>,
}

impl Principal {
    /// Flat, exact-match authority check. No hierarchy: ROLE_ADMIN does not
    /// imply ROLE_USER.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// 权限门：缺少要求的角色时返回 403
    pub fn require_authority(&self, authority: &str) -> Result<(), AppError> {
        if self.has_authority(authority) {
            Ok(())
        } else {
            tracing::debug!(
                username = %self.username,
                required = authority,
                "Authority check failed"
            );
            Err(AppError::Forbidden)
        }
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 Principal
// 没有身份时拒绝为 401
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取 Bearer 令牌，退回到会话 Cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }

    extract_cookie_token(headers)
}

/// 从 Authorization 头提取令牌
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// 从 Cookie 头提取会话令牌
fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// 会话中间件
///
/// 对每个请求运行一次。令牌有效则附加 Principal；缺失或校验失败
/// （过期、伪造、格式错误）都静默地按匿名继续。只改请求扩展，
/// 不碰共享状态，并发请求之间互不影响。
pub async fn session_middleware(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(req.headers()) {
        match codec.verify(&token) {
            Ok(claims) => {
                let principal = Principal {
                    username: claims.sub,
                    authorities: claims.authorities,
                };
                req.extensions_mut().insert(principal);
            }
            Err(e) => {
                // 无效令牌按匿名处理，角色检查稍后会拒绝
                tracing::debug!(reason = %e, "Ignoring invalid session token");
            }
        }
    }

    next.run(req).await
}
