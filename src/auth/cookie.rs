//! 会话 Cookie 构造
//!
//! 令牌的第二种传输通道。`Authorization: Bearer` 为规范通道，
//! 浏览器客户端使用同名 HttpOnly Cookie。

/// 会话令牌 Cookie 名称
pub const SESSION_COOKIE: &str = "TOKEN";

/// Build the Set-Cookie value carrying a session token
///
/// HttpOnly, SameSite=Lax, path-scoped to the whole API, max-age matching
/// the token TTL.
pub fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// Build the Set-Cookie value that clears the session cookie
///
/// An empty value with Max-Age=0 is the logout signal.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE)
}
