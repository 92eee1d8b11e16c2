//! 凭据存储接口
//!
//! 认证核心对持久层的全部依赖：按身份查凭据、唯一性检查、写回。
//! 生产实现是 `UserRepository`（Postgres）；测试用内存实现。

use crate::{
    error::AppError,
    models::user::{Credential, NewCredential},
};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 按用户名查找凭据（含权限集合）
    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, AppError>;

    /// 用户名是否已被占用（区分大小写的精确匹配）
    async fn username_taken(&self, username: &str) -> Result<bool, AppError>;

    /// 用户名是否被指定用户之外的人占用
    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: Uuid,
    ) -> Result<bool, AppError>;

    /// 持久化新凭据
    ///
    /// 唯一性由存储的约束保证；并发注册竞争同一用户名时，
    /// 落败方得到 `AlreadyExists`。
    async fn insert_credential(&self, new: NewCredential) -> Result<Credential, AppError>;

    /// 改名；与插入相同的唯一性语义
    async fn update_username(&self, user_id: Uuid, username: &str) -> Result<(), AppError>;

    /// 更新密码哈希
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError>;

    /// 更新姓名
    async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Credential, AppError>;

    /// 更新头像
    async fn update_picture(&self, user_id: Uuid, url: &str) -> Result<(), AppError>;
}
