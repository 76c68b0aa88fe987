//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers a small API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and active-link lookup
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click hand-off
//! - [`services::analytics_service::AnalyticsService`] - Recent clicks and geography

pub mod services;
