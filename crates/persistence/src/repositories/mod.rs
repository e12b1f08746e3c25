//! Repository implementations for database operations.

pub mod advertisement;
pub mod availability;
pub mod bank_details;
pub mod booking;
pub mod court;
pub mod dashboard;
pub mod event;
pub mod organization;
pub mod package;
pub mod staff;
pub mod ticket;
pub mod user;

pub use advertisement::AdvertisementRepository;
pub use availability::AvailabilityRepository;
pub use bank_details::BankDetailsRepository;
pub use booking::{BookingRepository, BookingWriteError, NewBooking};
pub use court::CourtRepository;
pub use dashboard::DashboardRepository;
pub use event::EventRepository;
pub use organization::OrganizationRepository;
pub use package::{NewPackageBooking, PackageRepository};
pub use staff::{NewStaffMember, StaffRepository};
pub use ticket::{TicketRepository, TicketScope, TicketWriteError};
pub use user::{NewUser, UserRepository};
