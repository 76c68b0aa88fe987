//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click job passed to the background worker
//! - [`click_worker`] - Click recording and the asynchronous worker loop
//!
//! # Click Processing Flow
//!
//! 1. Redirect resolver finds a valid mapping
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel (non-blocking)
//! 3. [`click_worker::run_click_worker`] picks it up and retries on failure
//! 4. [`click_worker::ClickRecorder`] increments the counter, resolves the
//!    country and inserts the click via the repositories

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
