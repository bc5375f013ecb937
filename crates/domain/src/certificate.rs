//! Certificate domain types.
//!
//! A certificate links exactly one user to exactly one event. The award date
//! is always assigned by the server when the record is written.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use eventcert_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Maximum length of a certificate type tag.
pub const CERTIFICATE_TYPE_MAX_LENGTH: usize = 64;

/// Identifier of a persisted certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(String);

impl CertificateId {
    /// Creates a certificate identifier from a persisted value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?.into()))
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Categorical certificate tag such as `PARTICIPATION`.
///
/// Tags are ASCII uppercase letters, digits and underscores. Lowercase input
/// is normalized to uppercase before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateType(String);

impl CertificateType {
    /// Creates a validated certificate type tag.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "certificate type must not be empty".to_owned(),
            ));
        }

        if normalized.len() > CERTIFICATE_TYPE_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "certificate type must not exceed {CERTIFICATE_TYPE_MAX_LENGTH} characters"
            )));
        }

        if !normalized.chars().all(|character| {
            character.is_ascii_uppercase() || character.is_ascii_digit() || character == '_'
        }) {
            return Err(AppError::Validation(format!(
                "certificate type '{normalized}' may only contain letters, digits and underscores"
            )));
        }

        Ok(Self(normalized))
    }

    /// Wraps a tag read back from storage as-is.
    ///
    /// Rows written before the current tag rules keep their original spelling.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for CertificateType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

/// Persisted certificate record without its relations loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    id: CertificateId,
    desc: String,
    date: DateTime<Utc>,
    certificate_type: CertificateType,
    user_id: NonEmptyString,
    event_id: NonEmptyString,
}

impl Certificate {
    /// Creates a certificate projection from persisted values.
    pub fn new(
        id: impl Into<String>,
        desc: impl Into<String>,
        date: DateTime<Utc>,
        certificate_type: CertificateType,
        user_id: impl Into<String>,
        event_id: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: CertificateId::new(id)?,
            desc: desc.into(),
            date,
            certificate_type,
            user_id: NonEmptyString::new(user_id)?,
            event_id: NonEmptyString::new(event_id)?,
        })
    }

    /// Returns the certificate identifier.
    #[must_use]
    pub fn id(&self) -> &CertificateId {
        &self.id
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn desc(&self) -> &str {
        self.desc.as_str()
    }

    /// Returns the server-assigned award timestamp.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the certificate type tag.
    #[must_use]
    pub fn certificate_type(&self) -> &CertificateType {
        &self.certificate_type
    }

    /// Returns the linked user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the linked event identifier.
    #[must_use]
    pub fn event_id(&self) -> &str {
        self.event_id.as_str()
    }
}

/// User linked to a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateUser {
    id: NonEmptyString,
    name: String,
    email: Option<String>,
}

impl CertificateUser {
    /// Creates a user projection.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            name: name.into(),
            email,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the user display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the user email when known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Event linked to a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateEvent {
    id: NonEmptyString,
    name: String,
    date: Option<DateTime<Utc>>,
}

impl CertificateEvent {
    /// Creates an event projection.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        date: Option<DateTime<Utc>>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            name: name.into(),
            date,
        })
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the scheduled event date when known.
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }
}

/// Certificate with its user and event eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    certificate: Certificate,
    user: CertificateUser,
    event: CertificateEvent,
}

impl CertificateDetails {
    /// Combines a certificate with its relations.
    ///
    /// Fails when the relations do not match the certificate foreign keys.
    pub fn new(
        certificate: Certificate,
        user: CertificateUser,
        event: CertificateEvent,
    ) -> AppResult<Self> {
        if certificate.user_id() != user.id() {
            return Err(AppError::Internal(format!(
                "certificate '{}' references user '{}' but user '{}' was loaded",
                certificate.id(),
                certificate.user_id(),
                user.id()
            )));
        }

        if certificate.event_id() != event.id() {
            return Err(AppError::Internal(format!(
                "certificate '{}' references event '{}' but event '{}' was loaded",
                certificate.id(),
                certificate.event_id(),
                event.id()
            )));
        }

        Ok(Self {
            certificate,
            user,
            event,
        })
    }

    /// Returns the certificate record.
    #[must_use]
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Returns the linked user.
    #[must_use]
    pub fn user(&self) -> &CertificateUser {
        &self.user
    }

    /// Returns the linked event.
    #[must_use]
    pub fn event(&self) -> &CertificateEvent {
        &self.event
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use super::{
        CERTIFICATE_TYPE_MAX_LENGTH, Certificate, CertificateDetails, CertificateEvent,
        CertificateId, CertificateType, CertificateUser,
    };

    fn participation() -> CertificateType {
        CertificateType::new("PARTICIPATION").unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn certificate_type_normalizes_case() {
        let parsed = "participation".parse::<CertificateType>();
        assert!(parsed.is_ok());
        assert_eq!(
            parsed.map(|value| value.as_str().to_owned()).ok().as_deref(),
            Some("PARTICIPATION")
        );
    }

    #[test]
    fn certificate_type_rejects_blank_and_punctuation() {
        assert!(CertificateType::new("   ").is_err());
        assert!(CertificateType::new("FIRST-PLACE").is_err());
        assert!(CertificateType::new("x".repeat(CERTIFICATE_TYPE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn stored_tags_are_kept_verbatim() {
        assert_eq!(CertificateType::from_stored("FIRST-PLACE").as_str(), "FIRST-PLACE");
        assert_eq!(CertificateType::from_stored("Participation").as_str(), "Participation");
    }

    #[test]
    fn certificate_id_rejects_empty_value() {
        assert!(CertificateId::new("").is_err());
    }

    #[test]
    fn certificate_requires_user_and_event() {
        let missing_user =
            Certificate::new("c1", "Workshop", Utc::now(), participation(), "", "e1");
        assert!(missing_user.is_err());

        let missing_event =
            Certificate::new("c1", "Workshop", Utc::now(), participation(), "u1", " ");
        assert!(missing_event.is_err());
    }

    #[test]
    fn details_reject_mismatched_relations() {
        let certificate =
            Certificate::new("c1", "Completed Workshop", Utc::now(), participation(), "u1", "e1");
        assert!(certificate.is_ok());
        let Ok(certificate) = certificate else {
            return;
        };

        let user = CertificateUser::new("u2", "Bob", None);
        let event = CertificateEvent::new("e1", "Rust Workshop", None);
        assert!(user.is_ok() && event.is_ok());
        let (Ok(user), Ok(event)) = (user, event) else {
            return;
        };

        assert!(CertificateDetails::new(certificate, user, event).is_err());
    }

    #[test]
    fn details_expose_populated_relations() {
        let certificate =
            Certificate::new("c1", "Completed Workshop", Utc::now(), participation(), "u1", "e1");
        let user = CertificateUser::new("u1", "Alice", Some("alice@example.com".to_owned()));
        let event = CertificateEvent::new("e1", "Rust Workshop", None);
        let (Ok(certificate), Ok(user), Ok(event)) = (certificate, user, event) else {
            panic!("fixture construction failed");
        };

        let details = CertificateDetails::new(certificate, user, event);
        assert!(details.is_ok());
        let Ok(details) = details else {
            return;
        };
        assert_eq!(details.user().id(), "u1");
        assert_eq!(details.user().email(), Some("alice@example.com"));
        assert_eq!(details.event().id(), "e1");
        assert_eq!(details.certificate().desc(), "Completed Workshop");
    }

    proptest! {
        #[test]
        fn valid_tags_round_trip_uppercased(tag in "[a-zA-Z0-9_]{1,64}") {
            let parsed = CertificateType::new(tag.clone());
            prop_assert!(parsed.is_ok());
            let parsed = parsed.unwrap_or_else(|_| unreachable!());
            prop_assert_eq!(parsed.as_str(), tag.to_ascii_uppercase());
        }

        #[test]
        fn tags_with_spaces_inside_are_rejected(left in "[A-Z]{1,10}", right in "[A-Z]{1,10}") {
            let tag = format!("{left} {right}");
            prop_assert!(CertificateType::new(tag).is_err());
        }
    }
}
