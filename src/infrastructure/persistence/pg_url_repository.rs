//! PostgreSQL implementation of the URL mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// PostgreSQL repository for URL mappings.
///
/// Uniqueness of `short_code` is enforced by the `urls_short_code_key`
/// constraint, so `create` is a single constraint-backed insert.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
}

impl From<UrlRow> for UrlMapping {
    fn from(r: UrlRow) -> Self {
        UrlMapping::new(
            r.id,
            r.original_url,
            r.short_code,
            r.created_at,
            r.expires_at,
            r.click_count,
        )
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let result = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (original_url, short_code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, original_url, short_code, created_at, expires_at, click_count
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.short_code)
        .bind(new_mapping.expires_at)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation(&e) => Err(AppError::alias_taken(&new_mapping.short_code)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, click_count
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn increment_click_count(&self, url_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE urls SET click_count = click_count + 1 WHERE id = $1")
            .bind(url_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
