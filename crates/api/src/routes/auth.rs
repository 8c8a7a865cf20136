//! Authentication routes for login, register, and password changes.
//!
//! Token issuance and credential hashing are consumed by the ledger routes
//! only through the verified claim the middleware attaches.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use recibo_core::auth::{hash_password, verify_password};
use recibo_db::UserRepository;
use recibo_db::repositories::user::from_db_role;
use recibo_shared::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserInfo,
};

/// Creates the public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Creates the auth routes that require a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/verify", get(verify))
        .route("/auth/change-password", post(change_password))
}

/// POST /auth/login - Authenticate a user and return a signed token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_credentials",
                "message": "Username and password are required"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let role = from_db_role(&user.role);
    let token = match state.jwt_service.generate_token(user.id, role) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Token generation failed");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "User logged in");

    (
        StatusCode::OK,
        Json(LoginResponse {
            token,
            user: UserInfo {
                id: user.id,
                username: user.username,
                role,
            },
        }),
    )
        .into_response()
}

/// POST /auth/register - Create a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_credentials",
                "message": "Username and password required"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.username_exists(&payload.username).await {
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "username_taken",
                    "message": "Username already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error during registration");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return internal_error();
        }
    };

    match user_repo
        .create(&payload.username, &password_hash, payload.role)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "User registered");
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "User created successfully",
                    "userId": user.id
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            internal_error()
        }
    }
}

/// GET /auth/verify - Echo the authenticated caller's identity.
async fn verify(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!({
                "user": UserInfo {
                    id: user.id,
                    username: user.username,
                    role: from_db_role(&user.role),
                }
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error during verify");
            internal_error()
        }
    }
}

/// POST /auth/change-password - Change the caller's password.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_fields",
                "message": "Current and new password required"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "user_not_found",
                    "message": "User not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during password change");
            return internal_error();
        }
    };

    match verify_password(&payload.current_password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_current_password",
                    "message": "Invalid current password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return internal_error();
        }
    };

    match user_repo.update_password(user.id, &password_hash).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Password updated successfully" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update password");
            internal_error()
        }
    }
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid credentials"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
