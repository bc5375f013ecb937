use std::collections::HashMap;

use async_trait::async_trait;
use eventcert_application::{CertificateRepository, NewCertificate};
use eventcert_core::{AppError, AppResult};
use eventcert_domain::{Certificate, CertificateDetails, CertificateEvent, CertificateUser};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct InMemoryCertificateState {
    users: HashMap<String, CertificateUser>,
    events: HashMap<String, CertificateEvent>,
    certificates: HashMap<String, Certificate>,
}

/// In-memory certificate repository implementation.
///
/// Users and events are seeded directly since no procedure manages them.
#[derive(Debug, Default)]
pub struct InMemoryCertificateRepository {
    state: RwLock<InMemoryCertificateState>,
}

impl InMemoryCertificateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(InMemoryCertificateState::default()),
        }
    }

    /// Stores or replaces a user that certificates may link to.
    pub async fn insert_user(&self, user: CertificateUser) {
        self.state
            .write()
            .await
            .users
            .insert(user.id().to_owned(), user);
    }

    /// Stores or replaces an event that certificates may link to.
    pub async fn insert_event(&self, event: CertificateEvent) {
        self.state
            .write()
            .await
            .events
            .insert(event.id().to_owned(), event);
    }

    /// Returns how many certificates are stored.
    pub async fn certificate_count(&self) -> usize {
        self.state.read().await.certificates.len()
    }
}

#[async_trait]
impl CertificateRepository for InMemoryCertificateRepository {
    async fn find_certificate_details(
        &self,
        certificate_id: &str,
    ) -> AppResult<Option<CertificateDetails>> {
        let state = self.state.read().await;
        let Some(certificate) = state.certificates.get(certificate_id) else {
            return Ok(None);
        };

        let user = state.users.get(certificate.user_id()).ok_or_else(|| {
            AppError::Internal(format!(
                "certificate '{certificate_id}' references missing user '{}'",
                certificate.user_id()
            ))
        })?;
        let event = state.events.get(certificate.event_id()).ok_or_else(|| {
            AppError::Internal(format!(
                "certificate '{certificate_id}' references missing event '{}'",
                certificate.event_id()
            ))
        })?;

        CertificateDetails::new(certificate.clone(), user.clone(), event.clone()).map(Some)
    }

    async fn create_certificate(&self, certificate: NewCertificate) -> AppResult<Certificate> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(certificate.user_id.as_str()) {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                certificate.user_id
            )));
        }

        if !state.events.contains_key(certificate.event_id.as_str()) {
            return Err(AppError::NotFound(format!(
                "event '{}' does not exist",
                certificate.event_id
            )));
        }

        let created = Certificate::new(
            Uuid::new_v4().to_string(),
            certificate.desc,
            certificate.date,
            certificate.certificate_type,
            certificate.user_id,
            certificate.event_id,
        )?;
        state
            .certificates
            .insert(created.id().as_str().to_owned(), created.clone());

        Ok(created)
    }
}

#[cfg(test)]
mod tests;
