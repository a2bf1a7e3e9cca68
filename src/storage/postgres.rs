//! Postgres storage
//!
//! Uniqueness of `code` is the primary key constraint, the redirect counter
//! is updated inside an explicit transaction holding a `FOR UPDATE` row
//! lock.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::links::Link;

use super::CreateLinkValues;
use super::Error;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of a link
#[derive(sqlx::FromRow)]
struct PostgresLink {
    /// Short code
    code: String,

    /// Target URL
    url: String,

    /// Number of completed redirects
    click_count: i64,

    /// Last completed redirect
    last_clicked: Option<DateTime<Utc>>,

    /// Creation date
    created_at: DateTime<Utc>,
}

impl Link {
    /// Create link from postgres version
    fn from_postgres_link(link: PostgresLink) -> Self {
        Self {
            code: link.code,
            url: link.url,
            click_count: link.click_count,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }
}

/// Translate a sqlx error to a storage error
///
/// A unique constraint violation means someone else holds the code, every
/// other failure is a connection error
fn map_sqlx_error(err: sqlx::Error) -> Error {
    if let Some(database_error) = err.as_database_error() {
        if database_error.is_unique_violation() {
            return Error::Duplicate;
        }
    }

    Error::Connection(err.to_string())
}

#[async_trait]
impl Storage for Postgres {
    async fn insert(&self, values: &CreateLinkValues) -> Result<Link> {
        let link = sqlx::query_as::<_, PostgresLink>(
            "INSERT INTO links (code, url)
             VALUES ($1, $2)
             RETURNING code, url, click_count, last_clicked, created_at",
        )
        .bind(values.code)
        .bind(values.url)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Link::from_postgres_link(link))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, PostgresLink>(
            "SELECT code, url, click_count, last_clicked, created_at
             FROM links
             WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(link.map(Link::from_postgres_link))
    }

    async fn find_all(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, PostgresLink>(
            "SELECT code, url, click_count, last_clicked, created_at
             FROM links
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(links.into_iter().map(Link::from_postgres_link).collect())
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM links WHERE code = $1")
            .bind(code)
            .execute(&self.connection_pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn resolve_and_increment(&self, code: &str) -> Result<Option<String>> {
        // a dropped transaction rolls back, so every early exit from this
        // block, including cancellation, leaves no partial increment behind
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(map_sqlx_error)?;

        let url: Option<String> =
            sqlx::query_scalar("SELECT url FROM links WHERE code = $1 FOR UPDATE")
                .bind(code)
                .fetch_optional(&mut *transaction)
                .await
                .map_err(map_sqlx_error)?;

        let Some(url) = url else {
            transaction.rollback().await.map_err(map_sqlx_error)?;

            return Ok(None);
        };

        sqlx::query(
            "UPDATE links
             SET click_count = click_count + 1, last_clicked = NOW()
             WHERE code = $1",
        )
        .bind(code)
        .execute(&mut *transaction)
        .await
        .map_err(map_sqlx_error)?;

        transaction.commit().await.map_err(map_sqlx_error)?;

        Ok(Some(url))
    }
}
