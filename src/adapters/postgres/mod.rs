//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - user accounts with a unique e-mail index
//! - `PostgresTaskRepository` - owner-scoped tasks with SQL filtering,
//!   pagination, bulk statements, and aggregate statistics

mod task_repository;
mod user_repository;

pub use task_repository::PostgresTaskRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::PgPool;

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
