//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - URL mapping storage in PostgreSQL
//! - [`PgClickRepository`] - Click events and aggregates in PostgreSQL
//! - [`InMemoryStore`] - Both repositories in process memory

pub mod memory;
pub mod pg_click_repository;
pub mod pg_url_repository;

pub use memory::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_url_repository::PgUrlRepository;
