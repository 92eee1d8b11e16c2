//! Server repository (数据库访问层)

use crate::{
    error::AppError,
    models::server::{Server, ServerDetail, ServerInput},
    repository::is_unique_violation,
};
use sqlx::PgPool;
use uuid::Uuid;

const DETAIL_SELECT: &str = r#"
    SELECT
        s.id,
        s.name,
        s.active,
        ss.name AS status,
        r.name AS region,
        st.name AS server_type,
        s.created_at
    FROM servers s
    JOIN server_statuses ss ON s.status_id = ss.id
    JOIN regions r ON s.region_id = r.id
    JOIN server_types st ON s.type_id = st.id
"#;

pub struct ServerRepository {
    db: PgPool,
}

impl ServerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有服务器（带参照名称）
    pub async fn list(&self) -> Result<Vec<ServerDetail>, AppError> {
        let sql = format!("{} ORDER BY s.created_at DESC", DETAIL_SELECT);
        let servers = sqlx::query_as::<_, ServerDetail>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(servers)
    }

    /// 根据 ID 查找服务器
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Server>, AppError> {
        let server = sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(server)
    }

    /// 根据 ID 查找服务器详情
    pub async fn find_detail_by_id(&self, id: &Uuid) -> Result<Option<ServerDetail>, AppError> {
        let sql = format!("{} WHERE s.id = $1", DETAIL_SELECT);
        let server = sqlx::query_as::<_, ServerDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(server)
    }

    /// 名称是否已被注册
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM servers WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 服务器是否存在
    pub async fn exists_by_id(&self, id: &Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM servers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 注册服务器
    pub async fn create(&self, input: &ServerInput, status_id: i32) -> Result<Server, AppError> {
        let server = sqlx::query_as::<_, Server>(
            r#"
            INSERT INTO servers (name, status_id, region_id, type_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(status_id)
        .bind(input.region_id)
        .bind(input.type_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("Server is already registered")
            } else {
                AppError::from(e)
            }
        })?;

        Ok(server)
    }

    /// 更新服务器
    pub async fn update(
        &self,
        id: Uuid,
        input: &ServerInput,
        status_id: i32,
    ) -> Result<Option<Server>, AppError> {
        let server = sqlx::query_as::<_, Server>(
            r#"
            UPDATE servers
            SET
                name = $2,
                status_id = $3,
                region_id = $4,
                type_id = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(status_id)
        .bind(input.region_id)
        .bind(input.type_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("Server is already registered")
            } else {
                AppError::from(e)
            }
        })?;

        Ok(server)
    }

    /// 删除服务器
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM servers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 停用服务器（只翻转 active 标记，状态不变）
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE servers SET active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
