//! Handlers for the `certificate` router.

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use eventcert_core::{AppError, AppResult, UserIdentity};
use tracing::{error, info, warn};

use crate::api_config::CertificateFailureMode;
use crate::dto::{
    AwardCertificateRequest, CertificateDetailsResponse, CertificateResponse,
    GetCertificateByIdQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// `getCertificateById` query. Public.
pub async fn get_certificate_by_id_handler(
    State(state): State<AppState>,
    Query(query): Query<GetCertificateByIdQuery>,
) -> ApiResult<Json<Option<CertificateDetailsResponse>>> {
    let result = state
        .certificate_service
        .get_certificate_by_id(query.id.as_str())
        .await
        .map(CertificateDetailsResponse::from);

    settle_procedure(state.failure_mode, "getCertificateById", result).map(Json)
}

/// `awardCertificate` mutation. Requires a session identity.
pub async fn award_certificate_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<AwardCertificateRequest>,
) -> ApiResult<(StatusCode, Json<Option<CertificateResponse>>)> {
    let result = state
        .certificate_service
        .award_certificate(payload.into())
        .await
        .inspect(|certificate| {
            info!(
                certificate_id = %certificate.id(),
                user_id = certificate.user_id(),
                event_id = certificate.event_id(),
                awarded_by = user.subject(),
                "certificate awarded"
            );
        })
        .map(CertificateResponse::from);

    let certificate = settle_procedure(state.failure_mode, "awardCertificate", result)?;
    let status = if certificate.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(certificate)))
}

/// Logs a failed procedure and shapes the answer for the configured failure mode.
///
/// In absent mode a persistence outcome (`NotFound` or `Internal`) becomes `None`,
/// which clients receive as `null`. Input rejections always surface as errors.
fn settle_procedure<T>(
    failure_mode: CertificateFailureMode,
    procedure: &'static str,
    result: AppResult<T>,
) -> ApiResult<Option<T>> {
    let error = match result {
        Ok(value) => return Ok(Some(value)),
        Err(error) => error,
    };

    if error.is_internal() {
        error!(procedure, %error, "certificate procedure failed");
    } else {
        warn!(procedure, %error, "certificate procedure rejected");
    }

    let masked = matches!(error, AppError::NotFound(_) | AppError::Internal(_));
    match failure_mode {
        CertificateFailureMode::Absent if masked => Ok(None),
        _ => Err(error.into()),
    }
}
