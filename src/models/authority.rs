//! Authority (role) tags
//!
//! Authorities are flat permission tags checked by exact membership.
//! There is no hierarchy between them.

/// Standard user role, granted to every account
pub const ROLE_USER: &str = "ROLE_USER";

/// Administrator role
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Authority set assigned to new accounts that did not request any
pub fn default_authorities() -> Vec<String> {
    vec![ROLE_USER.to_string()]
}

/// Every authority known to the system, for seeding
pub fn all_authorities() -> Vec<&'static str> {
    vec![ROLE_USER, ROLE_ADMIN]
}
