//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for click events and per-country aggregates.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    url_id: i64,
    clicked_at: DateTime<Utc>,
    ip_address: Option<String>,
    country: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click::new(
            r.id,
            r.url_id,
            r.clicked_at,
            r.ip_address,
            r.country.unwrap_or_default(),
        )
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (url_id, ip_address, country)
            VALUES ($1, $2, $3)
            RETURNING id, url_id, clicked_at, ip_address, country
            "#,
        )
        .bind(new_click.url_id)
        .bind(&new_click.ip_address)
        .bind(&new_click.country)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn recent(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, url_id, clicked_at, ip_address, country
            FROM clicks
            WHERE url_id = $1
            ORDER BY clicked_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(url_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_country(
        &self,
        url_id: i64,
    ) -> Result<Vec<(Option<String>, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (Option<String>, i64)>(
            r#"
            SELECT country, COUNT(*)
            FROM clicks
            WHERE url_id = $1
            GROUP BY country
            "#,
        )
        .bind(url_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }
}
