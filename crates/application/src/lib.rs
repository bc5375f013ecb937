//! Application services and ports.

#![forbid(unsafe_code)]

mod certificate_ports;
mod certificate_service;

pub use certificate_ports::{AwardCertificateInput, CertificateRepository, NewCertificate};
pub use certificate_service::CertificateService;
