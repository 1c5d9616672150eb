//! Custom Axum extractors.

pub mod session;
