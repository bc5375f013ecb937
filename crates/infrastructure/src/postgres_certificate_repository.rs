use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventcert_application::{CertificateRepository, NewCertificate};
use eventcert_core::{AppError, AppResult};
use eventcert_domain::{
    Certificate, CertificateDetails, CertificateEvent, CertificateType, CertificateUser,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;

/// PostgreSQL-backed certificate repository.
#[derive(Clone)]
pub struct PostgresCertificateRepository {
    pool: PgPool,
}

impl PostgresCertificateRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CertificateRow {
    id: String,
    description: String,
    awarded_at: DateTime<Utc>,
    certificate_type: String,
    user_id: String,
    event_id: String,
}

#[derive(Debug, FromRow)]
struct CertificateDetailsRow {
    id: String,
    description: String,
    awarded_at: DateTime<Utc>,
    certificate_type: String,
    user_id: String,
    event_id: String,
    user_name: String,
    user_email: Option<String>,
    event_name: String,
    event_date: Option<DateTime<Utc>>,
}

#[async_trait]
impl CertificateRepository for PostgresCertificateRepository {
    async fn find_certificate_details(
        &self,
        certificate_id: &str,
    ) -> AppResult<Option<CertificateDetails>> {
        if !is_storable_text(certificate_id) {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, CertificateDetailsRow>(
            r#"
            SELECT
                certificates.id,
                certificates.description,
                certificates.awarded_at,
                certificates.certificate_type,
                certificates.user_id,
                certificates.event_id,
                users.name AS user_name,
                users.email AS user_email,
                events.name AS event_name,
                events.event_date
            FROM certificates
            INNER JOIN users ON users.id = certificates.user_id
            INNER JOIN events ON events.id = certificates.event_id
            WHERE certificates.id = $1
            LIMIT 1
            "#,
        )
        .bind(certificate_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find certificate '{certificate_id}': {error}"
            ))
        })?;

        row.map(certificate_details_from_row).transpose()
    }

    async fn create_certificate(&self, certificate: NewCertificate) -> AppResult<Certificate> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start certificate award transaction: {error}"
            ))
        })?;

        lock_existing_link(&mut transaction, "users", "user", certificate.user_id.as_str())
            .await?;
        lock_existing_link(
            &mut transaction,
            "events",
            "event",
            certificate.event_id.as_str(),
        )
        .await?;

        let created = sqlx::query_as::<_, CertificateRow>(
            r#"
            INSERT INTO certificates (description, awarded_at, certificate_type, user_id, event_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, description, awarded_at, certificate_type, user_id, event_id
            "#,
        )
        .bind(certificate.desc.as_str())
        .bind(certificate.date)
        .bind(certificate.certificate_type.as_str())
        .bind(certificate.user_id.as_str())
        .bind(certificate.event_id.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| certificate_insert_error(error, &certificate))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit certificate award transaction: {error}"
            ))
        })?;

        debug!(certificate_id = %created.id, "certificate row inserted");
        certificate_from_row(created)
    }
}

/// Verifies that a linked row exists and holds it against concurrent deletion
/// until the surrounding transaction ends.
async fn lock_existing_link(
    transaction: &mut Transaction<'_, Postgres>,
    table: &'static str,
    label: &'static str,
    id: &str,
) -> AppResult<()> {
    if !is_storable_text(id) {
        return Err(AppError::NotFound(format!("{label} '{id}' does not exist")));
    }

    let query = format!("SELECT id FROM {table} WHERE id = $1 FOR KEY SHARE");
    let found = sqlx::query_scalar::<_, String>(query.as_str())
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up {label} '{id}': {error}"))
        })?;

    if found.is_none() {
        return Err(AppError::NotFound(format!("{label} '{id}' does not exist")));
    }

    Ok(())
}

/// PostgreSQL `TEXT` cannot hold NUL, so such a value never matches a stored key.
fn is_storable_text(value: &str) -> bool {
    !value.contains('\0')
}

fn certificate_insert_error(error: sqlx::Error, certificate: &NewCertificate) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!(
            "user '{}' or event '{}' does not exist",
            certificate.user_id, certificate.event_id
        ));
    }

    AppError::Internal(format!("failed to create certificate: {error}"))
}

fn certificate_from_row(row: CertificateRow) -> AppResult<Certificate> {
    Certificate::new(
        row.id,
        row.description,
        row.awarded_at,
        CertificateType::from_stored(row.certificate_type),
        row.user_id,
        row.event_id,
    )
}

fn certificate_details_from_row(row: CertificateDetailsRow) -> AppResult<CertificateDetails> {
    let user = CertificateUser::new(row.user_id.as_str(), row.user_name, row.user_email)?;
    let event = CertificateEvent::new(row.event_id.as_str(), row.event_name, row.event_date)?;
    let certificate = certificate_from_row(CertificateRow {
        id: row.id,
        description: row.description,
        awarded_at: row.awarded_at,
        certificate_type: row.certificate_type,
        user_id: row.user_id,
        event_id: row.event_id,
    })?;

    CertificateDetails::new(certificate, user, event)
}
