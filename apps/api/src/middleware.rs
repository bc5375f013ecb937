use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use eventcert_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};
use crate::error::ApiResult;
use crate::state::AppState;

const SESSION_ABSOLUTE_LIFETIME_SECONDS: i64 = 12 * 60 * 60;

/// Rejects requests without a session identity and hands the identity to the handler.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session creation time: {error}"))
        })?;
    if session_has_expired(created_at, chrono::Utc::now().timestamp()) {
        session
            .delete()
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    }

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Blocks state-changing requests that do not originate from the frontend.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        check_same_origin(request.headers(), state.frontend_url.as_str())?;
    }

    Ok(next.run(request).await)
}

/// Sessions without a recorded creation time are treated as expired.
fn session_has_expired(created_at: Option<i64>, now: i64) -> bool {
    created_at.is_none_or(|created_at| now - created_at > SESSION_ABSOLUTE_LIFETIME_SECONDS)
}

fn check_same_origin(headers: &HeaderMap, allowed_origin: &str) -> Result<(), AppError> {
    if headers
        .get("sec-fetch-site")
        .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
    {
        return Err(AppError::Unauthorized("cross-site request blocked".to_owned()));
    }

    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    };

    let origin_is_allowed = header_text(header::ORIGIN) == allowed_origin;
    let referer_is_allowed = header_text(header::REFERER).starts_with(allowed_origin);

    if !origin_is_allowed && !referer_is_allowed {
        return Err(AppError::Unauthorized("origin validation failed".to_owned()));
    }

    Ok(())
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
