//! Wire types for the `certificate` procedures.
//!
//! Field names follow the camelCase shape existing web clients already read.

use chrono::{DateTime, SecondsFormat, Utc};
use eventcert_application::AwardCertificateInput;
use eventcert_domain::{Certificate, CertificateDetails, CertificateEvent, CertificateUser};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string for `getCertificateById`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/get-certificate-by-id-query.ts"
)]
pub struct GetCertificateByIdQuery {
    pub id: String,
}

/// Incoming payload for `awardCertificate`.
///
/// Unknown fields are rejected, so callers cannot supply their own `date`.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/award-certificate-request.ts"
)]
pub struct AwardCertificateRequest {
    pub desc: String,
    #[serde(rename = "type")]
    pub certificate_type: String,
    pub user_id: String,
    pub event_id: String,
}

/// API representation of a certificate without relations.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/certificate-response.ts"
)]
pub struct CertificateResponse {
    pub id: String,
    pub desc: String,
    pub date: String,
    #[serde(rename = "type")]
    pub certificate_type: String,
    pub user_id: String,
    pub event_id: String,
}

/// API representation of a certificate holder.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/certificate-user-response.ts"
)]
pub struct CertificateUserResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// API representation of the event a certificate was awarded for.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/certificate-event-response.ts"
)]
pub struct CertificateEventResponse {
    pub id: String,
    pub name: String,
    pub date: Option<String>,
}

/// API representation of a certificate with its user and event embedded.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/certificate-details-response.ts"
)]
pub struct CertificateDetailsResponse {
    pub id: String,
    pub desc: String,
    pub date: String,
    #[serde(rename = "type")]
    pub certificate_type: String,
    pub user_id: String,
    pub event_id: String,
    pub user: CertificateUserResponse,
    pub event: CertificateEventResponse,
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<AwardCertificateRequest> for AwardCertificateInput {
    fn from(value: AwardCertificateRequest) -> Self {
        Self {
            desc: value.desc,
            certificate_type: value.certificate_type,
            user_id: value.user_id,
            event_id: value.event_id,
        }
    }
}

impl From<Certificate> for CertificateResponse {
    fn from(value: Certificate) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            desc: value.desc().to_owned(),
            date: format_timestamp(value.date()),
            certificate_type: value.certificate_type().as_str().to_owned(),
            user_id: value.user_id().to_owned(),
            event_id: value.event_id().to_owned(),
        }
    }
}

impl From<&CertificateUser> for CertificateUserResponse {
    fn from(value: &CertificateUser) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            email: value.email().map(ToOwned::to_owned),
        }
    }
}

impl From<&CertificateEvent> for CertificateEventResponse {
    fn from(value: &CertificateEvent) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            date: value.date().map(format_timestamp),
        }
    }
}

impl From<CertificateDetails> for CertificateDetailsResponse {
    fn from(value: CertificateDetails) -> Self {
        let certificate = CertificateResponse::from(value.certificate().clone());

        Self {
            id: certificate.id,
            desc: certificate.desc,
            date: certificate.date,
            certificate_type: certificate.certificate_type,
            user_id: certificate.user_id,
            event_id: certificate.event_id,
            user: CertificateUserResponse::from(value.user()),
            event: CertificateEventResponse::from(value.event()),
        }
    }
}
