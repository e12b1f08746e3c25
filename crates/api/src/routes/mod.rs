//! HTTP route handlers.

pub mod advertisements;
pub mod auth;
pub mod availability;
pub mod bank_details;
pub mod bookings;
pub mod courts;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod me;
pub mod organizations;
pub mod packages;
pub mod staff;
pub mod tickets;
pub mod users;

use shared::pagination::PageRequest;

use crate::app::AppState;

/// Page request clamped to `limits.max_page_size`.
pub(crate) fn page_request(state: &AppState, page: Option<i64>, per_page: Option<i64>) -> PageRequest {
    PageRequest::new(page, per_page, state.config.limits.max_page_size)
}
