use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventcert_core::AppResult;
use eventcert_domain::{Certificate, CertificateDetails, CertificateType};

/// Caller-supplied payload for awarding a certificate.
///
/// Carries no award date; the service assigns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardCertificateInput {
    /// Free-text description.
    pub desc: String,
    /// Raw certificate type tag.
    pub certificate_type: String,
    /// Identifier of an existing user.
    pub user_id: String,
    /// Identifier of an existing event.
    pub event_id: String,
}

/// Validated certificate ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertificate {
    /// Free-text description.
    pub desc: String,
    /// Server-assigned award timestamp.
    pub date: DateTime<Utc>,
    /// Certificate type tag.
    pub certificate_type: CertificateType,
    /// Identifier of the user to link.
    pub user_id: String,
    /// Identifier of the event to link.
    pub event_id: String,
}

/// Repository port for certificate persistence.
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    /// Returns the certificate with its user and event loaded, if it exists.
    async fn find_certificate_details(
        &self,
        certificate_id: &str,
    ) -> AppResult<Option<CertificateDetails>>;

    /// Creates a certificate linked to an existing user and event.
    ///
    /// Implementations must verify both links and insert atomically, returning
    /// `AppError::NotFound` without writing anything when either link is missing.
    async fn create_certificate(&self, certificate: NewCertificate) -> AppResult<Certificate>;
}
