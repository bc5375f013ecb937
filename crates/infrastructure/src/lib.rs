//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_certificate_repository;
mod postgres_certificate_repository;

pub use in_memory_certificate_repository::InMemoryCertificateRepository;
pub use postgres_certificate_repository::PostgresCertificateRepository;
