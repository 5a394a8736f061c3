use axum::{extract::State, Extension, Json};

use crate::error::{AppError, AppResult};
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest, User, UserRole};
use crate::services::auth::AuthService;
use crate::utils::jwt::AuthContext;
use crate::AppState;

/// Register a new account with the backend
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("Name and email are required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }
    if payload.role == UserRole::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts cannot self-register".to_string(),
        ));
    }

    let response = AuthService::new(state.api.clone()).register(&payload).await?;
    tracing::info!(user_id = %response.user.id, role = ?response.user.role, "User registered");
    Ok(Json(response))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = AuthService::new(state.api.clone()).login(&payload).await?;
    tracing::info!(user_id = %response.user.id, "User logged in");
    Ok(Json(response))
}

/// Profile of the token holder
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<User>> {
    let user = AuthService::new(state.api.with_token(&auth.token))
        .current_user()
        .await?;
    Ok(Json(user))
}
