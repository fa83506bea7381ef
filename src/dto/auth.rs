use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::users::Role;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LogoutRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserIdentity {
    pub username: String,
    pub email: String,
}

/// Returned by both registration and login: exactly one access and one
/// refresh token, issued as a side effect of the operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserIdentity,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub typ: String,
    pub exp: usize,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub typ: String,
    pub exp: usize,
}
