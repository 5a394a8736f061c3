use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Driver,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Customer
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus profile, as the backend answers register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults_to_customer() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name":"A","email":"a@x.in","password":"pw"}"#).unwrap();
        assert_eq!(req.role, UserRole::Customer);
    }

    #[test]
    fn test_auth_response_flattens_user() {
        let resp: AuthResponse = serde_json::from_str(
            r#"{"token":"t","_id":"u1","name":"Dev","email":"d@x.in","role":"driver"}"#,
        )
        .unwrap();
        assert_eq!(resp.user.id, "u1");
        assert_eq!(resp.user.role, UserRole::Driver);
    }
}
