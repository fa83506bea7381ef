use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{
        AuthResponse, Claims, LoginRequest, LogoutRequest, RefreshClaims, RegisterRequest,
        UserIdentity,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let RegisterRequest {
        username,
        email,
        password,
        role,
        phone_number,
        first_name,
        last_name,
    } = payload;

    if username.trim().is_empty() {
        return Err(AppError::Validation("username: must not be empty".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password: must not be empty".into()));
    }

    let exist = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Validation("username: already taken".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        first_name: Set(first_name),
        last_name: Set(last_name),
        role: Set(role),
        phone_number: Set(phone_number),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let resp = issue_token_pair(&user)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("User created", resp, Some(Meta::empty())))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let LoginRequest { username, password } = payload;

    let user = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let resp = issue_token_pair(&user)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn logout_user(
    state: &AppState,
    payload: LogoutRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let secret = jwt_secret()?;

    let decoded = decode::<RefreshClaims>(
        &payload.refresh,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::BadRequest("Invalid refresh token".into()))?;

    if decoded.claims.typ != "refresh" {
        return Err(AppError::BadRequest("Invalid refresh token".into()));
    }
    let jti = Uuid::parse_str(&decoded.claims.jti)
        .map_err(|_| AppError::BadRequest("Invalid refresh token".into()))?;

    // Check and insert are one statement, so a concurrent second logout with
    // the same token sees the conflict and affects zero rows.
    let result =
        sqlx::query("INSERT INTO revoked_tokens (jti) VALUES ($1) ON CONFLICT (jti) DO NOTHING")
            .bind(jti)
            .execute(&state.pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Refresh token already revoked".into()));
    }

    let user_id = Uuid::parse_str(&decoded.claims.sub).ok();
    if let Err(err) = log_audit(
        &state.pool,
        user_id,
        "user_logout",
        Some("users"),
        Some(serde_json::json!({ "jti": jti })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// One access token, one refresh token, both bound to the user.
fn issue_token_pair(user: &UserModel) -> AppResult<AuthResponse> {
    let secret = jwt_secret()?;
    let key = EncodingKey::from_secret(secret.as_bytes());

    let access_exp = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
    let access = encode(
        &Header::default(),
        &Claims {
            sub: user.id.to_string(),
            role: user.role,
            typ: "access".into(),
            exp: access_exp.timestamp() as usize,
        },
        &key,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let refresh_exp = Utc::now()
        .checked_add_signed(Duration::days(7))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
    let refresh = encode(
        &Header::default(),
        &RefreshClaims {
            sub: user.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            typ: "refresh".into(),
            exp: refresh_exp.timestamp() as usize,
        },
        &key,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(AuthResponse {
        user: UserIdentity {
            username: user.username.clone(),
            email: user.email.clone(),
        },
        access,
        refresh,
    })
}

fn jwt_secret() -> AppResult<String> {
    std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))
}
