//! Redirect resolution with fire-and-forget click recording.

use std::sync::Arc;

use axum::http::HeaderValue;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::utils::location::encode_location;

/// Resolves short codes to their targets and enqueues click jobs.
///
/// # State Machine
///
/// `LOOKUP → NOT_FOUND | EXPIRED | VALID`. Only `VALID` enqueues a click,
/// and only once its `Location` value has been built.
///
/// The click job is handed off with `try_send`, so a full or closed queue
/// drops the click and never delays or fails the redirect.
#[derive(Clone)]
pub struct RedirectService {
    links: Arc<LinkService>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl RedirectService {
    pub fn new(links: Arc<LinkService>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            links,
            click_sender,
        }
    }

    /// Returns the `Location` value for a valid code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or expired codes.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(
        &self,
        code: &str,
        ip_address: Option<String>,
    ) -> Result<HeaderValue, AppError> {
        let mapping = self.links.get_active_link(code).await?;

        let location = HeaderValue::try_from(encode_location(&mapping.original_url))
            .map_err(|e| {
                AppError::internal(
                    "Stored URL is not a valid Location header",
                    json!({ "code": code, "reason": e.to_string() }),
                )
            })?;

        let event = ClickEvent::new(mapping.id, mapping.short_code, ip_address);
        match self.click_sender.try_send(event) {
            Ok(()) => debug!(code, "Click queued"),
            Err(TrySendError::Full(event)) => {
                metrics::counter!("click_events_dropped_total").increment(1);
                warn!(code = %event.short_code, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("click_events_dropped_total").increment(1);
                warn!(code = %event.short_code, "Click queue closed, dropping click");
            }
        }

        Ok(location)
    }

    /// Returns true while the click worker is still receiving.
    pub fn is_queue_open(&self) -> bool {
        !self.click_sender.is_closed()
    }

    /// Remaining click queue capacity.
    pub fn queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlMapping;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::{Duration, Utc};

    fn mapping(code: &str, expires_in: Option<Duration>) -> UrlMapping {
        UrlMapping::new(
            5,
            "https://wikipedia.org".to_string(),
            code.to_string(),
            Utc::now(),
            expires_in.map(|d| Utc::now() + d),
            0,
        )
    }

    fn service_with(
        found: Option<UrlMapping>,
        capacity: usize,
    ) -> (RedirectService, mpsc::Receiver<ClickEvent>) {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .returning(move |_| Ok(found.clone()));

        let links = Arc::new(LinkService::new(Arc::new(repo), "http://localhost:3000"));
        let (tx, rx) = mpsc::channel(capacity);
        (RedirectService::new(links, tx), rx)
    }

    #[tokio::test]
    async fn test_resolve_valid_enqueues_click() {
        let (service, mut rx) = service_with(Some(mapping("wiki", None)), 8);

        let url = service
            .resolve("wiki", Some("203.0.113.1".to_string()))
            .await
            .unwrap();

        assert_eq!(url, "https://wikipedia.org");
        let event = rx.try_recv().unwrap();
        assert_eq!(event, ClickEvent::new(5, "wiki", Some("203.0.113.1".to_string())));
    }

    #[tokio::test]
    async fn test_resolve_encodes_target_before_enqueue() {
        let mut stored = mapping("ctl", None);
        stored.original_url = "https://example.com/a\nb c".to_string();
        let (service, mut rx) = service_with(Some(stored), 8);

        let location = service.resolve("ctl", None).await.unwrap();

        assert_eq!(location, "https://example.com/a%0Ab%20c");
        assert_eq!(rx.try_recv().unwrap().short_code, "ctl");
    }

    #[tokio::test]
    async fn test_resolve_not_found_records_nothing() {
        let (service, mut rx) = service_with(None, 8);

        let err = service.resolve("missing", None).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_expired_records_nothing() {
        let (service, mut rx) = service_with(Some(mapping("old", Some(Duration::hours(-1)))), 8);

        let err = service.resolve("old", None).await.unwrap_err();

        assert_eq!(err.message(), "URL expired");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_does_not_fail_redirect() {
        let (service, _rx) = service_with(Some(mapping("busy", None)), 1);

        assert!(service.resolve("busy", None).await.is_ok());
        assert!(service.resolve("busy", None).await.is_ok());
        assert_eq!(service.queue_capacity(), 0);
    }

    #[tokio::test]
    async fn test_closed_queue_does_not_fail_redirect() {
        let (service, rx) = service_with(Some(mapping("closed", None)), 4);
        drop(rx);

        assert!(!service.is_queue_open());
        assert!(service.resolve("closed", None).await.is_ok());
    }
}
