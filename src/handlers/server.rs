//! 服务器管理的 HTTP 处理器

use crate::{
    auth::session::Principal,
    error::AppError,
    middleware::AppState,
    models::authority::ROLE_USER,
    models::catalog::server_status,
    models::server::ServerInput,
    repository::{CatalogRepository, ServerRepository},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出服务器
pub async fn list_servers(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ServerRepository::new(state.db.clone());
    let servers = repo.list().await?;

    Ok(Json(servers))
}

/// 获取服务器详情
pub async fn get_server(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ServerRepository::new(state.db.clone());
    let server = repo
        .find_detail_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Server not found"))?;

    Ok(Json(server))
}

/// 注册服务器
///
/// 名称唯一；区域和类型必须已存在；新服务器固定从 ACTIVE 状态开始。
pub async fn register_server(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(input): Json<ServerInput>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    input.validate()?;

    let repo = ServerRepository::new(state.db.clone());
    let catalog = CatalogRepository::new(state.db.clone());

    if repo.exists_by_name(&input.name).await? {
        return Err(AppError::already_exists("Server is already registered"));
    }

    if !catalog.region_exists(input.region_id).await? {
        return Err(AppError::not_found("Specified region not found"));
    }

    if !catalog.server_type_exists(input.type_id).await? {
        return Err(AppError::not_found("Can't find specified server type"));
    }

    let active_status = catalog.server_status_id(server_status::ACTIVE).await?;
    let server = repo.create(&input, active_status).await?;

    Ok(Json(server))
}

/// 更新服务器
pub async fn update_server(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(input): Json<ServerInput>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    input.validate()?;

    let status_id = input
        .status_id
        .ok_or_else(|| AppError::validation("status_id is required!"))?;

    let catalog = CatalogRepository::new(state.db.clone());

    if !catalog.server_status_exists(status_id).await? {
        return Err(AppError::not_found("Can't find specified server status"));
    }

    if !catalog.region_exists(input.region_id).await? {
        return Err(AppError::not_found("Specified region not found"));
    }

    if !catalog.server_type_exists(input.type_id).await? {
        return Err(AppError::not_found("Can't find specified server type"));
    }

    let repo = ServerRepository::new(state.db.clone());
    let server = repo
        .update(id, &input, status_id)
        .await?
        .ok_or_else(|| AppError::not_found("Can't find specified server."))?;

    Ok(Json(server))
}

/// 删除服务器
pub async fn delete_server(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ServerRepository::new(state.db.clone());
    repo.delete(id).await?;

    Ok(Json(json!({"message": "Deleted successfully"})))
}

/// 停用服务器
pub async fn deactivate_server(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ServerRepository::new(state.db.clone());

    if !repo.deactivate(id).await? {
        return Err(AppError::not_found("Can't find specified server."));
    }

    let server = repo
        .find_detail_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Can't find specified server."))?;

    Ok(Json(server))
}
