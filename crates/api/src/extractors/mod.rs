//! Custom Axum extractors.

pub mod current_user;
