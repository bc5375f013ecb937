use eventcert_application::CertificateService;

use crate::api_config::CertificateFailureMode;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub certificate_service: CertificateService,
    pub failure_mode: CertificateFailureMode,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
