//! Utility functions for code generation and request handling.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`client_ip`] - Client address extraction from HTTP headers
//! - [`location`] - Percent-encoding of redirect targets

pub mod client_ip;
pub mod code_generator;
pub mod location;
