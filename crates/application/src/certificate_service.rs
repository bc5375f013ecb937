use std::sync::Arc;

use chrono::Utc;
use eventcert_core::{AppError, AppResult, NonEmptyString};
use eventcert_domain::{Certificate, CertificateDetails, CertificateType};

use crate::certificate_ports::{AwardCertificateInput, CertificateRepository, NewCertificate};

/// Application service for certificate lookup and awarding.
#[derive(Clone)]
pub struct CertificateService {
    repository: Arc<dyn CertificateRepository>,
}

impl CertificateService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn CertificateRepository>) -> Self {
        Self { repository }
    }

    /// Returns one certificate with its user and event.
    pub async fn get_certificate_by_id(
        &self,
        certificate_id: &str,
    ) -> AppResult<CertificateDetails> {
        self.repository
            .find_certificate_details(certificate_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("certificate '{certificate_id}' does not exist"))
            })
    }

    /// Awards a certificate dated at the moment of the call.
    pub async fn award_certificate(&self, input: AwardCertificateInput) -> AppResult<Certificate> {
        if input.desc.contains('\0') {
            return Err(AppError::Validation(
                "desc must not contain NUL characters".to_owned(),
            ));
        }
        let certificate_type = CertificateType::new(input.certificate_type)?;
        let user_id = NonEmptyString::new(input.user_id)
            .map_err(|_| AppError::Validation("userId must not be empty".to_owned()))?;
        let event_id = NonEmptyString::new(input.event_id)
            .map_err(|_| AppError::Validation("eventId must not be empty".to_owned()))?;

        self.repository
            .create_certificate(NewCertificate {
                desc: input.desc,
                date: Utc::now(),
                certificate_type,
                user_id: user_id.into(),
                event_id: event_id.into(),
            })
            .await
    }
}

#[cfg(test)]
mod tests;
