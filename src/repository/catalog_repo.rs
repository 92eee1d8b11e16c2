//! Catalog repository (参照数据访问)
//!
//! 区域、服务器类型、服务器状态、项目状态的只读查询。

use crate::{
    error::AppError,
    models::catalog::{ProjectStatus, Region, ServerStatus, ServerType},
};
use sqlx::PgPool;

pub struct CatalogRepository {
    db: PgPool,
}

impl CatalogRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有区域
    pub async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
        let regions = sqlx::query_as::<_, Region>("SELECT * FROM regions ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(regions)
    }

    /// 列出所有服务器类型
    pub async fn list_server_types(&self) -> Result<Vec<ServerType>, AppError> {
        let types = sqlx::query_as::<_, ServerType>("SELECT * FROM server_types ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        Ok(types)
    }

    /// 列出所有服务器状态
    pub async fn list_server_statuses(&self) -> Result<Vec<ServerStatus>, AppError> {
        let statuses =
            sqlx::query_as::<_, ServerStatus>("SELECT * FROM server_statuses ORDER BY id")
                .fetch_all(&self.db)
                .await?;

        Ok(statuses)
    }

    /// 列出所有项目状态
    pub async fn list_project_statuses(&self) -> Result<Vec<ProjectStatus>, AppError> {
        let statuses =
            sqlx::query_as::<_, ProjectStatus>("SELECT * FROM project_statuses ORDER BY id")
                .fetch_all(&self.db)
                .await?;

        Ok(statuses)
    }

    /// 区域是否存在
    pub async fn region_exists(&self, id: i32) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM regions WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 服务器类型是否存在
    pub async fn server_type_exists(&self, id: i32) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM server_types WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 服务器状态是否存在
    pub async fn server_status_exists(&self, id: i32) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM server_statuses WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 按名称取服务器状态 ID（ACTIVE/INACTIVE）
    pub async fn server_status_id(&self, name: &str) -> Result<i32, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM server_statuses WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.db)
                .await?;

        row.map(|(id,)| id)
            .ok_or_else(|| AppError::not_found("server status"))
    }

    /// 项目状态是否存在
    pub async fn project_status_exists(&self, id: i32) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM project_statuses WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 默认项目状态
    pub async fn default_project_status(&self) -> Result<ProjectStatus, AppError> {
        let status = sqlx::query_as::<_, ProjectStatus>(
            "SELECT * FROM project_statuses WHERE is_default = TRUE",
        )
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("default project status"))?;

        Ok(status)
    }
}
