//! 认证服务：注册、登录与会话变更流程

use crate::{
    auth::password::PasswordHasher,
    auth::session::Principal,
    auth::token::TokenCodec,
    error::AppError,
    models::authority::default_authorities,
    models::user::{
        Credential, NewCredential, RegisterRequest, UpdateProfileRequest, UserResponse,
        UserWithToken,
    },
    repository::CredentialStore,
};
use std::sync::Arc;

/// 新账号的默认头像
const DEFAULT_PROFILE_PICTURE: &str =
    "https://img.freepik.com/free-vector/businessman-character-avatar-isolated_24877-60111.jpg";

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, codec: Arc<TokenCodec>) -> Self {
        Self {
            store,
            codec,
            hasher: PasswordHasher::new(),
        }
    }

    /// 用户登录
    ///
    /// 用户名不存在和密码错误返回同一个错误，不给枚举用户名的线索。
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(credential) = self.store.find_credential(username).await? else {
            tracing::debug!("Login failed: unknown username");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &credential.user.password_hash) {
            tracing::debug!(username = %username, "Login failed: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .codec
            .issue(&credential.user.username, credential.authorities)?;

        tracing::info!(username = %username, "User logged in");
        Ok(token)
    }

    /// 注册新用户
    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AppError> {
        if req.username.trim().is_empty() {
            return Err(AppError::validation("username can't be empty"));
        }

        // 区分大小写的精确匹配；真正的唯一性由存储约束兜底
        if self.store.username_taken(&req.username).await? {
            return Err(AppError::already_exists("username is taken!"));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let authorities = match req.authorities {
            Some(authorities) if !authorities.is_empty() => authorities,
            _ => default_authorities(),
        };

        let credential = self
            .store
            .insert_credential(NewCredential {
                username: req.username,
                password_hash,
                first_name: req.first_name,
                last_name: req.last_name,
                profile_picture: Some(DEFAULT_PROFILE_PICTURE.to_string()),
                authorities,
            })
            .await?;

        tracing::info!(username = %credential.user.username, "User registered");
        Ok(credential.user.into())
    }

    /// 当前用户信息
    pub async fn me(&self, principal: &Principal) -> Result<UserResponse, AppError> {
        let credential = self.require_credential(&principal.username).await?;
        Ok(credential.user.into())
    }

    /// 更新姓名，不影响会话状态
    pub async fn update_profile(
        &self,
        principal: &Principal,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        let credential = self.require_credential(&principal.username).await?;

        let updated = self
            .store
            .update_profile(
                credential.user.id,
                req.first_name.as_deref(),
                req.last_name.as_deref(),
            )
            .await?;

        Ok(updated.user.into())
    }

    /// 改用户名
    ///
    /// 旧令牌在自然过期前仍然能通过签名校验，服务端没有吊销手段；
    /// 所以改名成功后给调用方换发一个绑定新身份的令牌。其他客户端
    /// 持有的旧令牌不受影响。改成当前用户名视为成功但不换发。
    pub async fn change_username(
        &self,
        principal: &Principal,
        new_username: &str,
    ) -> Result<UserWithToken, AppError> {
        if new_username.trim().is_empty() {
            return Err(AppError::validation("username can't be empty"));
        }

        let credential = self.require_credential(&principal.username).await?;

        // 排除自己后检查占用
        if self
            .store
            .username_taken_by_other(new_username, credential.user.id)
            .await?
        {
            return Err(AppError::already_exists("username is already in use"));
        }

        let changed = credential.user.username != new_username;
        if !changed {
            return Ok(UserWithToken {
                user: credential.user.into(),
                token: None,
            });
        }

        self.store
            .update_username(credential.user.id, new_username)
            .await?;

        let fresh = self.require_credential(new_username).await?;
        let token = self
            .codec
            .issue(&fresh.user.username, fresh.authorities.clone())?;

        tracing::info!(
            old = %principal.username,
            new = %new_username,
            "Username changed, session token re-minted"
        );

        Ok(UserWithToken {
            user: fresh.user.into(),
            token: Some(token),
        })
    }

    /// 改密码
    ///
    /// 只换哈希。调用方应当丢弃手里的令牌重新登录；这是客户端约定，
    /// 不是服务端吊销。
    pub async fn change_password(
        &self,
        principal: &Principal,
        new_password: &str,
    ) -> Result<(), AppError> {
        let credential = self.require_credential(&principal.username).await?;

        let password_hash = self.hasher.hash(new_password)?;
        self.store
            .update_password(credential.user.id, &password_hash)
            .await?;

        tracing::info!(username = %principal.username, "Password changed");
        Ok(())
    }

    /// 改头像
    pub async fn change_profile_picture(
        &self,
        principal: &Principal,
        url: &str,
    ) -> Result<(), AppError> {
        let credential = self.require_credential(&principal.username).await?;

        self.store.update_picture(credential.user.id, url).await?;
        Ok(())
    }

    /// 按身份取凭据；查不到按未认证处理
    ///
    /// 令牌有效但身份已不在存储里（比如改名后还拿着旧令牌），
    /// 等同于会话失效。
    async fn require_credential(&self, username: &str) -> Result<Credential, AppError> {
        self.store
            .find_credential(username)
            .await?
            .ok_or_else(|| {
                tracing::debug!(username = %username, "Authenticated user not found in store");
                AppError::Unauthorized
            })
    }
}
