//! Project repository (数据库访问层)

use crate::{
    error::AppError,
    models::project::{Project, ProjectInput, ProjectServer},
    repository::is_unique_violation,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct ProjectRepository {
    db: PgPool,
}

impl ProjectRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有项目
    pub async fn list(&self) -> Result<Vec<Project>, AppError> {
        let projects =
            sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(projects)
    }

    /// 根据 ID 查找项目
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(project)
    }

    /// 项目状态名称
    pub async fn status_name(&self, status_id: i32) -> Result<String, AppError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM project_statuses WHERE id = $1")
                .bind(status_id)
                .fetch_optional(&self.db)
                .await?;

        row.map(|(name,)| name)
            .ok_or_else(|| AppError::not_found("project status"))
    }

    /// 项目挂载的服务器
    pub async fn servers_of(&self, project_id: Uuid) -> Result<Vec<ProjectServer>, AppError> {
        let servers = sqlx::query_as::<_, ProjectServer>(
            r#"
            SELECT s.id, s.name, s.active
            FROM project_servers ps
            JOIN servers s ON ps.server_id = s.id
            WHERE ps.project_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(servers)
    }

    /// 名称是否已被使用
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 注册项目及其服务器关联
    pub async fn create(&self, input: &ProjectInput, status_id: i32) -> Result<Project, AppError> {
        let mut tx = self.db.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, details, status_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.details)
        .bind(status_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("There's already a project with the specified name!")
            } else {
                AppError::from(e)
            }
        })?;

        Self::replace_servers(&mut tx, project.id, &input.server_ids).await?;

        tx.commit().await?;

        Ok(project)
    }

    /// 更新项目及其服务器关联
    pub async fn update(
        &self,
        id: Uuid,
        input: &ProjectInput,
        status_id: i32,
    ) -> Result<Option<Project>, AppError> {
        let mut tx = self.db.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, details = $3, status_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.details)
        .bind(status_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("There's already a project with the specified name!")
            } else {
                AppError::from(e)
            }
        })?;

        let Some(project) = project else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM project_servers WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::replace_servers(&mut tx, id, &input.server_ids).await?;

        tx.commit().await?;

        Ok(Some(project))
    }

    /// 删除项目
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_servers(
        tx: &mut Transaction<'_, Postgres>,
        project_id: Uuid,
        server_ids: &[Uuid],
    ) -> Result<(), AppError> {
        for server_id in server_ids {
            sqlx::query(
                r#"
                INSERT INTO project_servers (project_id, server_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(project_id)
            .bind(server_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
