use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use eventcert_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

/// Builds the `certificate` procedure router.
///
/// `getCertificateById` is public; `awardCertificate` sits behind the session gate.
fn certificate_routes() -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/awardCertificate",
            post(handlers::certificate::award_certificate_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    Router::new()
        .route(
            "/getCertificateById",
            get(handlers::certificate::get_certificate_by_id_handler),
        )
        .merge(protected)
}

pub fn build_router<S>(
    app_state: AppState,
    session_layer: SessionManagerLayer<S>,
) -> Result<Router, AppError>
where
    S: SessionStore + Clone,
{
    let cors_layer = cors::build_cors_layer(app_state.frontend_url.as_str())?;

    let protected_auth_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_auth_routes)
        .nest("/api/certificate", certificate_routes())
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
