use chrono::Utc;
use eventcert_application::{CertificateRepository, NewCertificate};
use eventcert_core::AppError;
use eventcert_domain::{CertificateEvent, CertificateType, CertificateUser};

use super::InMemoryCertificateRepository;

async fn seeded_repository() -> InMemoryCertificateRepository {
    let repository = InMemoryCertificateRepository::new();
    let user = CertificateUser::new("u1", "Alice", Some("alice@example.com".to_owned()));
    let event = CertificateEvent::new("e1", "Rust Workshop", None);
    assert!(user.is_ok() && event.is_ok());
    if let (Ok(user), Ok(event)) = (user, event) {
        repository.insert_user(user).await;
        repository.insert_event(event).await;
    }
    repository
}

fn new_certificate(user_id: &str, event_id: &str) -> NewCertificate {
    NewCertificate {
        desc: "Completed Workshop".to_owned(),
        date: Utc::now(),
        certificate_type: CertificateType::new("PARTICIPATION")
            .unwrap_or_else(|_| unreachable!()),
        user_id: user_id.to_owned(),
        event_id: event_id.to_owned(),
    }
}

#[tokio::test]
async fn created_certificate_gets_generated_id_and_resolves_relations() {
    let repository = seeded_repository().await;

    let first = repository.create_certificate(new_certificate("u1", "e1")).await;
    let second = repository.create_certificate(new_certificate("u1", "e1")).await;
    assert!(first.is_ok() && second.is_ok());
    let (Ok(first), Ok(second)) = (first, second) else {
        return;
    };
    assert_ne!(first.id(), second.id());

    let details = repository
        .find_certificate_details(first.id().as_str())
        .await;
    assert!(details.is_ok());
    let Some(details) = details.unwrap_or(None) else {
        panic!("created certificate was not found");
    };
    assert_eq!(details.certificate(), &first);
    assert_eq!(details.user().name(), "Alice");
    assert_eq!(details.event().name(), "Rust Workshop");
}

#[tokio::test]
async fn missing_links_are_rejected_without_writing() {
    let repository = seeded_repository().await;

    let missing_user = repository
        .create_certificate(new_certificate("ghost", "e1"))
        .await;
    assert!(matches!(missing_user, Err(AppError::NotFound(_))));

    let missing_event = repository
        .create_certificate(new_certificate("u1", "ghost"))
        .await;
    assert!(matches!(missing_event, Err(AppError::NotFound(_))));

    assert_eq!(repository.certificate_count().await, 0);
}

#[tokio::test]
async fn unknown_certificate_is_absent() {
    let repository = seeded_repository().await;

    let found = repository.find_certificate_details("nope").await;
    assert!(found.is_ok());
    assert!(found.unwrap_or(None).is_none());
}
