//! Project domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub details: Option<String>,
    pub status_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Project with status name and attached servers, for presentation
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub name: String,
    pub details: Option<String>,
    pub status: String,
    pub servers: Vec<ProjectServer>,
    pub created_at: DateTime<Utc>,
}

/// Server summary inside a project view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectServer {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
}

/// Project create/update request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct ProjectInput {
    /// Present on update, absent on register
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "project name can't be blank"))]
    pub name: String,
    pub details: Option<String>,
    #[serde(default)]
    pub server_ids: Vec<Uuid>,
    /// Ignored on register (new projects get the default status)
    pub status_id: Option<i32>,
}
