//! 启动播种
//! 参照数据（权限、状态、类型、区域）由迁移写入；这里只负责
//! 需要运行时哈希的管理员账号。

use crate::{
    config::AppConfig,
    error::AppError,
    models::authority::{ROLE_ADMIN, ROLE_USER},
    models::user::RegisterRequest,
    services::AuthService,
};
use secrecy::ExposeSecret;

/// 创建默认管理员账号
///
/// 未配置管理员密码时跳过；账号已存在时静默返回。
pub async fn seed_admin(auth_service: &AuthService, config: &AppConfig) -> Result<(), AppError> {
    let Some(password) = &config.seed.admin_password else {
        tracing::info!("Admin password not configured, skipping admin seeding");
        return Ok(());
    };

    let request = RegisterRequest {
        username: config.seed.admin_username.clone(),
        password: password.expose_secret().clone(),
        first_name: Some("admin".to_string()),
        last_name: Some("admin".to_string()),
        authorities: Some(vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()]),
    };

    match auth_service.register(request).await {
        Ok(_) => {
            tracing::info!(username = %config.seed.admin_username, "Seeded admin user");
            Ok(())
        }
        Err(AppError::AlreadyExists(_)) => {
            tracing::info!("Admin user already seeded");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
