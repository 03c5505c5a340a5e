//! Session wire types

use serde::{Deserialize, Serialize};

/// Authenticated user as issued by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub role: String,
    pub permissions: Vec<String>,
    pub token: String,
}

/// Response of `GET /auth/validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub user: Option<User>,
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}
