//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
};

use crate::{auth, handlers, middleware::AppState};

/// 请求体大小上限（1 MiB）
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需令牌）
    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/register", post(handlers::auth::register));

    // 需要会话的路由
    // 会话中间件对所有请求都只是"尽力附加身份"，角色检查在各个
    // handler 里声明，所以这里不需要单独的强制层
    let session_routes = Router::new()
        // 当前用户
        .route("/api/v1/auth/me", get(handlers::auth::me))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))

        // 账号维护
        .route("/api/v1/account/profile", put(handlers::account::update_profile))
        .route("/api/v1/account/username", put(handlers::account::change_username))
        .route("/api/v1/account/password", put(handlers::account::change_password))
        .route("/api/v1/account/picture", put(handlers::account::change_profile_picture))

        // 服务器
        .route(
            "/api/v1/servers",
            get(handlers::server::list_servers).post(handlers::server::register_server),
        )
        .route(
            "/api/v1/servers/{id}",
            get(handlers::server::get_server)
                .put(handlers::server::update_server)
                .delete(handlers::server::delete_server),
        )
        .route(
            "/api/v1/servers/{id}/deactivate",
            post(handlers::server::deactivate_server),
        )

        // 项目
        .route(
            "/api/v1/projects",
            get(handlers::project::list_projects).post(handlers::project::register_project),
        )
        .route(
            "/api/v1/projects/{id}",
            get(handlers::project::get_project)
                .put(handlers::project::update_project)
                .delete(handlers::project::delete_project),
        )

        // 参照数据
        .route("/api/v1/regions", get(handlers::catalog::list_regions))
        .route("/api/v1/server-types", get(handlers::catalog::list_server_types))
        .route("/api/v1/server-statuses", get(handlers::catalog::list_server_statuses))
        .route("/api/v1/project-statuses", get(handlers::catalog::list_project_statuses));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(session_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.token_codec.clone(),
            auth::session::session_middleware,
        ))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
