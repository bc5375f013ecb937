//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod certificate;

pub use certificate::{
    CERTIFICATE_TYPE_MAX_LENGTH, Certificate, CertificateDetails, CertificateEvent,
    CertificateId, CertificateType, CertificateUser,
};
