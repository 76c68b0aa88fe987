//! Data Transfer Objects for API requests and responses.
//!
//! Every JSON response is wrapped in [`envelope::ApiResponse`].

pub mod analytics;
pub mod envelope;
pub mod health;
pub mod shorten;
