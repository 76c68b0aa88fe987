//! Process-local store implementing both repositories.
//!
//! Used by the HTTP integration tests and by embedders that do not need
//! durability. A single mutex guards mappings and clicks, which makes the
//! uniqueness check and insert of `create` one atomic step.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Click, NewClick, NewUrlMapping, UrlMapping};
use crate::domain::repositories::{ClickRepository, UrlRepository};
use crate::error::AppError;
use serde_json::json;

#[derive(Debug, Default)]
struct Tables {
    urls: Vec<UrlMapping>,
    by_code: HashMap<String, usize>,
    clicks: Vec<Click>,
}

/// In-memory implementation of [`UrlRepository`] and [`ClickRepository`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("In-memory store poisoned", json!({})))
    }
}

#[async_trait]
impl UrlRepository for InMemoryStore {
    async fn create(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let mut tables = self.lock()?;

        if tables.by_code.contains_key(&new_mapping.short_code) {
            return Err(AppError::alias_taken(&new_mapping.short_code));
        }

        let mapping = UrlMapping::new(
            tables.urls.len() as i64 + 1,
            new_mapping.original_url,
            new_mapping.short_code,
            Utc::now(),
            new_mapping.expires_at,
            0,
        );

        let index = tables.urls.len();
        tables.by_code.insert(mapping.short_code.clone(), index);
        tables.urls.push(mapping.clone());

        Ok(mapping)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .by_code
            .get(code)
            .map(|&index| tables.urls[index].clone()))
    }

    async fn increment_click_count(&self, url_id: i64) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if let Some(mapping) = tables.urls.iter_mut().find(|m| m.id == url_id) {
            mapping.click_count += 1;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut tables = self.lock()?;

        if !tables.urls.iter().any(|m| m.id == new_click.url_id) {
            return Err(AppError::internal(
                "Click references unknown mapping",
                json!({ "url_id": new_click.url_id }),
            ));
        }

        let click = Click::new(
            tables.clicks.len() as i64 + 1,
            new_click.url_id,
            Utc::now(),
            new_click.ip_address,
            new_click.country,
        );
        tables.clicks.push(click.clone());

        Ok(click)
    }

    async fn recent(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let tables = self.lock()?;

        let mut clicks: Vec<Click> = tables
            .clicks
            .iter()
            .filter(|c| c.url_id == url_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));
        clicks.truncate(limit.max(0) as usize);

        Ok(clicks)
    }

    async fn count_by_country(
        &self,
        url_id: i64,
    ) -> Result<Vec<(Option<String>, i64)>, AppError> {
        let tables = self.lock()?;

        let mut counts: HashMap<String, i64> = HashMap::new();
        for click in tables.clicks.iter().filter(|c| c.url_id == url_id) {
            *counts.entry(click.country.clone()).or_insert(0) += 1;
        }

        Ok(counts.into_iter().map(|(c, n)| (Some(c), n)).collect())
    }
}
