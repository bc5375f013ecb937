use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use eventcert_core::{AppError, AppResult};
use eventcert_domain::{Certificate, CertificateDetails, CertificateEvent, CertificateUser};

use super::{AwardCertificateInput, CertificateRepository, CertificateService, NewCertificate};

#[derive(Default)]
struct FakeCertificateRepository {
    users: HashSet<String>,
    events: HashSet<String>,
    created: Mutex<Vec<NewCertificate>>,
    fail_reads: bool,
}

impl FakeCertificateRepository {
    fn with_links(users: &[&str], events: &[&str]) -> Self {
        Self {
            users: users.iter().map(|value| (*value).to_owned()).collect(),
            events: events.iter().map(|value| (*value).to_owned()).collect(),
            ..Self::default()
        }
    }

    fn created_count(&self) -> usize {
        self.created.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CertificateRepository for FakeCertificateRepository {
    async fn find_certificate_details(
        &self,
        certificate_id: &str,
    ) -> AppResult<Option<CertificateDetails>> {
        if self.fail_reads {
            return Err(AppError::Internal("connection refused".to_owned()));
        }

        let created = self
            .created
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock repo state: {error}")))?;
        let Some((index, certificate)) = created
            .iter()
            .enumerate()
            .find(|(index, _)| format!("cert-{index}") == certificate_id)
        else {
            return Ok(None);
        };

        let certificate = Certificate::new(
            format!("cert-{index}"),
            certificate.desc.clone(),
            certificate.date,
            certificate.certificate_type.clone(),
            certificate.user_id.clone(),
            certificate.event_id.clone(),
        )?;
        let user = CertificateUser::new(certificate.user_id(), "Test User", None)?;
        let event = CertificateEvent::new(certificate.event_id(), "Test Event", None)?;

        CertificateDetails::new(certificate, user, event).map(Some)
    }

    async fn create_certificate(&self, certificate: NewCertificate) -> AppResult<Certificate> {
        if !self.users.contains(&certificate.user_id) {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                certificate.user_id
            )));
        }
        if !self.events.contains(&certificate.event_id) {
            return Err(AppError::NotFound(format!(
                "event '{}' does not exist",
                certificate.event_id
            )));
        }

        let mut created = self
            .created
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock repo state: {error}")))?;
        let id = format!("cert-{}", created.len());
        created.push(certificate.clone());

        Certificate::new(
            id,
            certificate.desc,
            certificate.date,
            certificate.certificate_type,
            certificate.user_id,
            certificate.event_id,
        )
    }
}

fn workshop_input(user_id: &str, event_id: &str) -> AwardCertificateInput {
    AwardCertificateInput {
        desc: "Completed Workshop".to_owned(),
        certificate_type: "PARTICIPATION".to_owned(),
        user_id: user_id.to_owned(),
        event_id: event_id.to_owned(),
    }
}

#[tokio::test]
async fn award_certificate_dates_record_at_call_time() {
    let repository = Arc::new(FakeCertificateRepository::with_links(&["u1"], &["e1"]));
    let service = CertificateService::new(repository.clone());

    let before = Utc::now();
    let awarded = service.award_certificate(workshop_input("u1", "e1")).await;
    let after = Utc::now();

    assert!(awarded.is_ok());
    let Ok(awarded) = awarded else {
        return;
    };
    assert!(awarded.date() >= before && awarded.date() <= after);
    assert_eq!(awarded.certificate_type().as_str(), "PARTICIPATION");
    assert_eq!(awarded.user_id(), "u1");
    assert_eq!(awarded.event_id(), "e1");
    assert_eq!(repository.created_count(), 1);
}

#[tokio::test]
async fn award_certificate_then_lookup_returns_populated_relations() {
    let repository = Arc::new(FakeCertificateRepository::with_links(&["u1"], &["e1"]));
    let service = CertificateService::new(repository);

    let awarded = service.award_certificate(workshop_input("u1", "e1")).await;
    assert!(awarded.is_ok());
    let Ok(awarded) = awarded else {
        return;
    };

    let details = service
        .get_certificate_by_id(awarded.id().as_str())
        .await;
    assert!(details.is_ok());
    let Ok(details) = details else {
        return;
    };
    assert_eq!(details.certificate(), &awarded);
    assert_eq!(details.user().id(), "u1");
    assert_eq!(details.event().id(), "e1");
}

#[tokio::test]
async fn award_certificate_with_unknown_user_creates_nothing() {
    let repository = Arc::new(FakeCertificateRepository::with_links(&["u1"], &["e1"]));
    let service = CertificateService::new(repository.clone());

    let result = service.award_certificate(workshop_input("ghost", "e1")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = service.award_certificate(workshop_input("u1", "ghost")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    assert_eq!(repository.created_count(), 0);
}

#[tokio::test]
async fn award_certificate_rejects_malformed_input_before_persisting() {
    let repository = Arc::new(FakeCertificateRepository::with_links(&["u1"], &["e1"]));
    let service = CertificateService::new(repository.clone());

    let mut bad_type = workshop_input("u1", "e1");
    bad_type.certificate_type = "first place!".to_owned();
    assert!(matches!(
        service.award_certificate(bad_type).await,
        Err(AppError::Validation(_))
    ));

    assert!(matches!(
        service.award_certificate(workshop_input("  ", "e1")).await,
        Err(AppError::Validation(_))
    ));

    let mut nul_desc = workshop_input("u1", "e1");
    nul_desc.desc = "Completed\0Workshop".to_owned();
    assert!(matches!(
        service.award_certificate(nul_desc).await,
        Err(AppError::Validation(_))
    ));

    assert_eq!(repository.created_count(), 0);
}

#[tokio::test]
async fn get_certificate_by_id_reports_missing_record_as_not_found() {
    let service = CertificateService::new(Arc::new(FakeCertificateRepository::default()));

    let result = service.get_certificate_by_id("does-not-exist").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn get_certificate_by_id_propagates_persistence_failures() {
    let service = CertificateService::new(Arc::new(FakeCertificateRepository {
        fail_reads: true,
        ..FakeCertificateRepository::default()
    }));

    let result = service.get_certificate_by_id("cert-0").await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}
