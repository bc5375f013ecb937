mod certificate;
mod common;

pub use certificate::{
    AwardCertificateRequest, CertificateDetailsResponse, CertificateResponse,
    GetCertificateByIdQuery,
};
pub use common::{HealthResponse, UserIdentityResponse};
