//! Server domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server instance
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Server {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub status_id: i32,
    pub region_id: i32,
    pub type_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Server with joined catalog names, for presentation
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServerDetail {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub status: String,
    pub region: String,
    pub server_type: String,
    pub created_at: DateTime<Utc>,
}

/// Server create/update request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct ServerInput {
    /// Present on update, absent on register
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "server name can't be blank"))]
    pub name: String,
    pub region_id: i32,
    pub type_id: i32,
    /// Ignored on register (new servers start ACTIVE)
    pub status_id: Option<i32>,
}
