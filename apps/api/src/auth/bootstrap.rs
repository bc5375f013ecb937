use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use eventcert_core::{AppError, NonEmptyString, UserIdentity};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub subject: String,
    pub token: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Exchanges the operator bootstrap token for an authenticated session.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        warn!(subject = %payload.subject, "bootstrap login rejected");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let subject = String::from(NonEmptyString::new(payload.subject)?);
    let display_name = payload
        .display_name
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| subject.clone());
    let identity = UserIdentity::new(subject.clone(), display_name, payload.email);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(%subject, "bootstrap session established");
    Ok(StatusCode::NO_CONTENT)
}
