//! Catalog reference models: regions, server types and statuses
//!
//! Reference rows are seeded by migration and read-only at the API level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployment region
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Region {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Server environment classification (DEVELOPMENT, STAGING, PRODUCTION)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServerType {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Server operational status (ACTIVE, INACTIVE)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServerStatus {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Project lifecycle status; exactly one row is flagged as the default
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectStatus {
    pub id: i32,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub mod server_status {
    pub const ACTIVE: &str = "ACTIVE";
    pub const INACTIVE: &str = "INACTIVE";
}

pub mod server_type {
    pub const DEVELOPMENT: &str = "DEVELOPMENT";
    pub const STAGING: &str = "STAGING";
    pub const PRODUCTION: &str = "PRODUCTION";
}
