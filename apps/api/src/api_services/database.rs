use eventcert_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const MAX_POOL_CONNECTIONS: u32 = 10;

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_POOL_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to run certificate migrations: {error}"))
        })?;

    Ok(pool)
}
