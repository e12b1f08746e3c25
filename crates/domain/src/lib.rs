//! Domain layer for the Facility Manager backend.
//!
//! This crate contains:
//! - Domain models and request/response types (organizations, courts,
//!   bookings, events, packages, tickets, advertisements, bank details)
//! - Role and permission rules
//! - Pure booking logic: slot conflict detection, day schedules, pricing

pub mod models;
pub mod services;
