//! 参照数据的 HTTP 处理器
//! 区域、服务器类型与状态、项目状态的只读列表

use crate::{
    auth::session::Principal,
    error::AppError,
    middleware::AppState,
    models::authority::ROLE_USER,
    repository::CatalogRepository,
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 列出区域
pub async fn list_regions(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = CatalogRepository::new(state.db.clone());
    Ok(Json(repo.list_regions().await?))
}

/// 列出服务器类型
pub async fn list_server_types(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = CatalogRepository::new(state.db.clone());
    Ok(Json(repo.list_server_types().await?))
}

/// 列出服务器状态
pub async fn list_server_statuses(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = CatalogRepository::new(state.db.clone());
    Ok(Json(repo.list_server_statuses().await?))
}

/// 列出项目状态
pub async fn list_project_statuses(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = CatalogRepository::new(state.db.clone());
    Ok(Json(repo.list_project_statuses().await?))
}
