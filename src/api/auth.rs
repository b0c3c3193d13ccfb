use axum::{
    Form, Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, LandingDto, validation};

/// Session key holding the authenticated identity.
const IDENTITY_KEY: &str = "identity";

/// Session key for the read-once flash message.
const FLASH_KEY: &str = "flash";

/// The authenticated username+badge pair, established by login or
/// registration and checked by the auth gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub username: String,
    pub badge: i32,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub badge: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub new_username: String,
    pub new_password: String,
    pub new_badge: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Auth gate for all record-management routes: requests without a session
/// identity are redirected to the landing page before any handler runs.
pub async fn auth_middleware(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_)) = session.get::<SessionIdentity>(IDENTITY_KEY).await {
        return next.run(request).await;
    }

    Redirect::to("/").into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
/// Landing page; an already-authenticated session goes straight to the
/// dashboard.
pub async fn index(session: Session) -> Result<Response, ApiError> {
    if let Ok(Some(_)) = session.get::<SessionIdentity>(IDENTITY_KEY).await {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(Json(ApiResponse::success(LandingDto {
        authenticated: false,
    }))
    .into_response())
}

/// POST /login
/// Username, badge and password must jointly match one account. Failures get
/// one generic message, never a hint at which field was wrong.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    let badge = validation::parse_badge(&payload.badge)?;

    let is_valid = state
        .store()
        .verify_user_password(&payload.username, badge, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password - Register First:".to_string(),
        ));
    }

    establish_identity(&session, &payload.username, badge).await?;

    tracing::info!("User logged in: {}", payload.username);
    Ok(Redirect::to("/dashboard").into_response())
}

/// POST /register
/// Creates an account and logs it in as one step. Uniqueness conflicts are
/// reported by field, username first.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<RegisterRequest>,
) -> Result<Response, ApiError> {
    if payload.new_username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.new_password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    let badge = validation::parse_badge(&payload.new_badge)?;

    let security = state.config().read().await.security.clone();

    let user = state
        .store()
        .create_user(&payload.new_username, &payload.new_password, badge, &security)
        .await
        .map_err(|e| match e {
            crate::db::RegisterError::UsernameTaken => {
                ApiError::Conflict("Username already exists.".to_string())
            }
            crate::db::RegisterError::BadgeTaken => {
                ApiError::Conflict("Badge number already exists.".to_string())
            }
            other => ApiError::internal(format!("Registration error: {other}")),
        })?;

    establish_identity(&session, &user.username, user.badge).await?;

    tracing::info!("Registered new user: {}", user.username);
    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /logout
pub async fn logout(session: Session) -> Response {
    let _ = session.flush().await;
    Redirect::to("/").into_response()
}

// ============================================================================
// Helpers
// ============================================================================

async fn establish_identity(
    session: &Session,
    username: &str,
    badge: i32,
) -> Result<(), ApiError> {
    session
        .insert(
            IDENTITY_KEY,
            SessionIdentity {
                username: username.to_string(),
                badge,
            },
        )
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

/// Stores a read-once flash message for the next listing response.
pub(crate) async fn set_flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH_KEY, message.to_string()).await;
}

/// Consumes the pending flash message, if any.
pub(crate) async fn take_flash(session: &Session) -> Option<String> {
    session.remove::<String>(FLASH_KEY).await.ok().flatten()
}
