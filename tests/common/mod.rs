#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkpulse::config::RateLimitConfig;
use linkpulse::domain::click_event::ClickEvent;
use linkpulse::domain::click_worker::{ClickRecorder, run_click_worker};
use linkpulse::domain::entities::{NewUrlMapping, UrlMapping};
use linkpulse::domain::repositories::UrlRepository;
use linkpulse::infrastructure::geoip::{GeoLocator, NullGeoLocator};
use linkpulse::infrastructure::persistence::InMemoryStore;
use linkpulse::routes;
use linkpulse::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Knobs for [`TestApp::with_options`].
pub struct TestOptions {
    pub rate_limit: RateLimitConfig,
    pub behind_proxy: bool,
    pub queue_capacity: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig {
                burst: 1_000,
                period_ms: 1,
            },
            behind_proxy: true,
            queue_capacity: 100,
        }
    }
}

/// Full router over an in-memory store, with the click queue left
/// undrained so tests decide when clicks are recorded.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub clicks_rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<ClickRecorder>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(TestOptions::default())
    }

    pub fn with_options(options: TestOptions) -> Self {
        Self::with_locator(options, Arc::new(NullGeoLocator::new()))
    }

    pub fn with_locator(options: TestOptions, geo: Arc<dyn GeoLocator>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let (tx, rx) = mpsc::channel(options.queue_capacity);

        let state = AppState::new(
            store.clone(),
            store.clone(),
            tx,
            BASE_URL,
            options.behind_proxy,
        );

        let app: Router = routes::router(state, options.rate_limit)
            .unwrap()
            .layer(MockConnectInfoLayer);

        let recorder =
            Arc::new(ClickRecorder::new(store.clone(), store.clone(), geo).with_retry_base_ms(1));

        Self {
            server: TestServer::new(app).unwrap(),
            store,
            clicks_rx: rx,
            recorder,
        }
    }

    /// Runs the click worker over every click currently queued, returning
    /// how many there were.
    ///
    /// The router keeps its sender alive, so the queued events are moved to
    /// a fresh channel whose sender is dropped and the worker stops once it
    /// has drained them.
    pub async fn drain_clicks(&mut self) -> usize {
        let mut events = Vec::new();
        while let Ok(event) = self.clicks_rx.try_recv() {
            events.push(event);
        }

        let queued = events.len();
        let (tx, rx) = mpsc::channel(queued.max(1));
        for event in events {
            tx.send(event).await.unwrap();
        }
        drop(tx);

        run_click_worker(rx, self.recorder.clone(), 4).await;
        queued
    }

    pub async fn insert_link(
        &self,
        code: &str,
        url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> UrlMapping {
        self.store
            .create(NewUrlMapping {
                original_url: url.to_string(),
                short_code: code.to_string(),
                expires_at,
            })
            .await
            .unwrap()
    }
}
