//! Shared application state injected into handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, LinkService, RedirectService};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, UrlRepository};

/// State cloned into every request.
///
/// Holds only `Arc`-wrapped services and the click queue sender; the store
/// connection pool lives behind the repositories.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub analytics_service: Arc<AnalyticsService>,
    /// Read client addresses from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services around the given repositories and click queue.
    pub fn new(
        urls: Arc<dyn UrlRepository>,
        clicks: Arc<dyn ClickRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
        base_url: impl Into<String>,
        behind_proxy: bool,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(urls, base_url));
        let redirect_service = Arc::new(RedirectService::new(link_service.clone(), click_sender));
        let analytics_service = Arc::new(AnalyticsService::new(link_service.clone(), clicks));

        Self {
            link_service,
            redirect_service,
            analytics_service,
            behind_proxy,
        }
    }
}
