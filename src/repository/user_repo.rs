//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::user::{Credential, NewCredential, User},
    repository::{credential_store::CredentialStore, is_unique_violation},
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 获取用户的权限集合
    pub async fn authorities_of(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let authorities: Vec<(String,)> = sqlx::query_as(
            "SELECT authority FROM user_authorities WHERE user_id = $1 ORDER BY authority",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(authorities.into_iter().map(|(a,)| a).collect())
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, AppError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };

        let authorities = self.authorities_of(user.id).await?;
        Ok(Some(Credential { user, authorities }))
    }

    async fn username_taken(&self, username: &str) -> Result<bool, AppError> {
        let (taken,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.db)
                .await?;

        Ok(taken)
    }

    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: Uuid,
    ) -> Result<bool, AppError> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
        )
        .bind(username)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(taken)
    }

    async fn insert_credential(&self, new: NewCredential) -> Result<Credential, AppError> {
        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, profile_picture)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.profile_picture)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("username is taken")
            } else {
                AppError::from(e)
            }
        })?;

        for authority in &new.authorities {
            sqlx::query("INSERT INTO authorities (authority) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(authority)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO user_authorities (user_id, authority) VALUES ($1, $2)")
                .bind(user.id)
                .bind(authority)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Credential {
            user,
            authorities: new.authorities,
        })
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(username)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("username is already in use")
            } else {
                AppError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Credential, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

        let authorities = self.authorities_of(user.id).await?;
        Ok(Credential { user, authorities })
    }

    async fn update_picture(&self, user_id: Uuid, url: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET profile_picture = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(url)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }
}
