use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest, User};

use super::{ApiClient, ApiError};

#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.api.post("/auth/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.api.post("/auth/login", request).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.api.get("/auth/me").await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<serde_json::Value, ApiError> {
        self.api.delete(&format!("/auth/users/{}", user_id)).await
    }
}
