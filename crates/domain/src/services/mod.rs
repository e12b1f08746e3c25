//! Domain services.
//!
//! Pure business logic operating on domain models; no I/O.

pub mod availability;
pub mod pricing;

pub use availability::{day_of_week, AvailabilityError, CourtCalendar};
pub use pricing::{court_booking_price, package_stay_price};
