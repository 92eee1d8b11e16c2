//! Authentication and authorization module

pub mod cookie;
pub mod password;
pub mod session;
pub mod token;

pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use password::PasswordHasher;
pub use session::{extract_token, session_middleware, Principal};
pub use token::{Claims, TokenCodec, TokenError};
