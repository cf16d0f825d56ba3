//! Signed-in console user.

use serde::{Deserialize, Serialize};

/// User profile as returned by the session endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Role", default)]
    pub role: String,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Response of `GET /api/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub data: Option<User>,
}
