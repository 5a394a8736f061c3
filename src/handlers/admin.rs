use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::booking::DashboardStats;
use crate::models::bus::{NewRoute, Route};
use crate::models::user::User;
use crate::services::admin::AdminService;
use crate::services::auth::AuthService;
use crate::services::bus::BusService;
use crate::utils::jwt::AuthContext;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Admin overview: totals, revenue and the latest bookings
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<DashboardStats>> {
    let stats = AdminService::new(state.api.with_token(&auth.token))
        .overview()
        .await?;
    Ok(Json(stats))
}

/// Figures as the backend computes them
pub async fn backend_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = AdminService::new(state.api.with_token(&auth.token))
        .dashboard_stats()
        .await?;
    Ok(Json(stats))
}

// ============ User Management ============

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<User>>> {
    let users = AdminService::new(state.api.with_token(&auth.token))
        .all_users()
        .await?;
    Ok(Json(users))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if user_id == auth.claims.sub {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    AuthService::new(state.api.with_token(&auth.token))
        .delete_user(&user_id)
        .await?;
    tracing::info!(user_id = %user_id, "User deleted");
    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<User>> {
    if payload.status.trim().is_empty() {
        return Err(AppError::BadRequest("Status is required".to_string()));
    }

    let user = AdminService::new(state.api.with_token(&auth.token))
        .update_user_status(&user_id, payload.status.trim())
        .await?;
    Ok(Json(user))
}

// ============ Route Management ============

pub async fn list_routes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<Route>>> {
    let routes = BusService::new(state.api.with_token(&auth.token))
        .all_routes()
        .await?;
    Ok(Json(routes))
}

pub async fn add_route(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<NewRoute>,
) -> AppResult<Json<Route>> {
    payload.validate()?;
    let route = BusService::new(state.api.with_token(&auth.token))
        .add_route(&payload)
        .await?;
    tracing::info!(route_id = %route.id, from = %route.from, to = %route.to, "Route added");
    Ok(Json(route))
}

pub async fn delete_route(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(route_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    BusService::new(state.api.with_token(&auth.token))
        .delete_route(&route_id)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Route deleted" })))
}
