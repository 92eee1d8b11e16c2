//! 项目管理的 HTTP 处理器

use crate::{
    auth::session::Principal,
    error::AppError,
    middleware::AppState,
    models::authority::ROLE_USER,
    models::project::{ProjectDetail, ProjectInput},
    repository::{CatalogRepository, ProjectRepository, ServerRepository},
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

/// 列出项目
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ProjectRepository::new(state.db.clone());
    let projects = repo.list().await?;

    Ok(Json(projects))
}

/// 获取项目详情（含状态名称和挂载的服务器）
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ProjectRepository::new(state.db.clone());
    let project = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    let status = repo.status_name(project.status_id).await?;
    let servers = repo.servers_of(project.id).await?;

    Ok(Json(ProjectDetail {
        id: project.id,
        name: project.name,
        details: project.details,
        status,
        servers,
        created_at: project.created_at,
    }))
}

/// 注册项目
///
/// 名称唯一；引用的服务器必须都存在；新项目拿默认状态。
pub async fn register_project(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    input.validate()?;

    let repo = ProjectRepository::new(state.db.clone());

    if repo.exists_by_name(&input.name).await? {
        return Err(AppError::already_exists(
            "There's already a project with the specified name!",
        ));
    }

    ensure_servers_exist(&state, &input.server_ids).await?;

    let catalog = CatalogRepository::new(state.db.clone());
    let default_status = catalog.default_project_status().await?;

    let project = repo.create(&input, default_status.id).await?;

    Ok(Json(project))
}

/// 更新项目
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;
    input.validate()?;

    let status_id = input
        .status_id
        .ok_or_else(|| AppError::validation("status_id is required!"))?;

    let catalog = CatalogRepository::new(state.db.clone());
    if !catalog.project_status_exists(status_id).await? {
        return Err(AppError::not_found("Couldn't find specified status"));
    }

    ensure_servers_exist(&state, &input.server_ids).await?;

    let repo = ProjectRepository::new(state.db.clone());
    let project = repo
        .update(id, &input, status_id)
        .await?
        .ok_or_else(|| AppError::not_found("Couldn't find specified project"))?;

    Ok(Json(project))
}

/// 删除项目
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_authority(ROLE_USER)?;

    let repo = ProjectRepository::new(state.db.clone());
    repo.delete(id).await?;

    Ok(Json(json!({"message": "Deleted successfully"})))
}

/// 检查引用的服务器是否都存在
async fn ensure_servers_exist(state: &AppState, server_ids: &[Uuid]) -> Result<(), AppError> {
    let servers = ServerRepository::new(state.db.clone());

    for server_id in server_ids {
        if !servers.exists_by_id(server_id).await? {
            return Err(AppError::NotFound(format!("Server id {} not found", server_id)));
        }
    }

    Ok(())
}
