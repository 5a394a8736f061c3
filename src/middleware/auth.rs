use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::{AppError, AppResult};
use crate::models::user::UserRole;
use crate::utils::jwt::{verify_token, AuthContext};
use crate::AppState;

/// Verify the backend-issued bearer token and keep it for forwarding
pub async fn auth_middleware(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(claims.clone());
    request.extensions_mut().insert(AuthContext {
        token: auth.token().to_string(),
        claims,
    });
    Ok(next.run(request).await)
}

fn check_role(request: &Request, role: UserRole, denied: &str) -> AppResult<()> {
    let context = request
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))?;

    if context.claims.role != role {
        return Err(AppError::Forbidden(denied.to_string()));
    }
    Ok(())
}

/// Require admin role
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    check_role(&request, UserRole::Admin, "Admin access required")?;
    Ok(next.run(request).await)
}

/// Require driver role
pub async fn require_driver(request: Request, next: Next) -> AppResult<Response> {
    check_role(&request, UserRole::Driver, "Driver access required")?;
    Ok(next.run(request).await)
}

/// Require customer role
pub async fn require_customer(request: Request, next: Next) -> AppResult<Response> {
    check_role(&request, UserRole::Customer, "Customer access required")?;
    Ok(next.run(request).await)
}
