//! Domain models for the facility manager.

pub mod advertisement;
pub mod availability;
pub mod bank_details;
pub mod booking;
pub mod court;
pub mod dashboard;
pub mod event;
pub mod organization;
pub mod package;
pub mod permission;
pub mod staff;
pub mod ticket;
pub mod user;

pub use advertisement::{AdPlacement, Advertisement};
pub use availability::{AvailabilityBlock, DaySchedule, RecurringUnavailability, TimeInterval};
pub use bank_details::BankDetails;
pub use booking::{Booking, BookingStatus};
pub use court::Court;
pub use event::Event;
pub use organization::{Organization, OrganizationType};
pub use package::{Package, PackageBooking};
pub use permission::Permission;
pub use staff::StaffMember;
pub use ticket::{Ticket, TicketMessage, TicketPriority, TicketStatus};
pub use user::{User, UserRole};
