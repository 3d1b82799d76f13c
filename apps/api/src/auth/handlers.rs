use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::{jwt, AuthUser};
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::models::user::UserRow;
use crate::onboarding::handlers::{upsert_assessment, AssessmentInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    /// The questionnaire may be bundled with signup so onboarding is one call.
    #[serde(default)]
    pub assessment: Option<AssessmentInput>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserRow,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessmentRow>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserRow,
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = req.email.trim().to_lowercase();
    let full_name = req.full_name.trim().to_string();

    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    validate_password_strength(&req.password).map_err(AppError::Validation)?;
    if let Some(assessment) = &req.assessment {
        assessment.validate()?;
    }

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?;

    let mut tx = state.db.begin().await?;

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, full_name, role, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&full_name)
    .bind(req.role.trim())
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await?;

    let assessment = match &req.assessment {
        Some(input) => Some(upsert_assessment(&mut *tx, user.id, input).await?),
        None => None,
    };

    tx.commit().await?;

    let access_token = jwt::issue_token(
        user.id,
        &user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiry_mins,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {e}")))?;

    info!("Created user {} ({})", user.id, user.email);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user,
            access_token,
            assessment,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    // Same rejection for unknown email and wrong password
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
    let user = user.ok_or_else(invalid)?;

    let verified = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let access_token = jwt::issue_token(
        user.id,
        &user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiry_mins,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {e}")))?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
        access_token,
        assessment: None,
    }))
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = fetch_user(&state.db, auth.user_id).await?;
    Ok(Json(MeResponse { user }))
}

/// Loads a user row or maps its absence to a 404.
pub(crate) async fn fetch_user(db: &PgPool, id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain with an
/// alphabetic TLD of at least two characters.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@exam ple.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@example.c"));
        assert!(!is_valid_email("ada@example.c0m"));
    }
}
