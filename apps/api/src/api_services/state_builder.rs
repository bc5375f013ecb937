use std::sync::Arc;

use eventcert_application::CertificateService;
use eventcert_infrastructure::PostgresCertificateRepository;
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let certificate_repository = Arc::new(PostgresCertificateRepository::new(pool));

    AppState {
        certificate_service: CertificateService::new(certificate_repository),
        failure_mode: config.failure_mode,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
