//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod advertisement;
pub mod booking;
pub mod court;
pub mod event;
pub mod organization;
pub mod staff;
pub mod ticket;
pub mod user;

pub use advertisement::{AdPlacementDb, AdvertisementEntity, BankDetailsEntity};
pub use booking::{BookingEntity, PackageBookingEntity};
pub use court::{AvailabilityBlockEntity, CourtEntity, RecurringUnavailabilityEntity};
pub use event::{EventEntity, PackageEntity};
pub use organization::{OrganizationEntity, OrganizationTypeDb};
pub use staff::StaffMemberEntity;
pub use ticket::{TicketEntity, TicketMessageEntity, TicketPriorityDb, TicketStatusDb};
pub use user::{UserEntity, UserRoleDb, UserSessionEntity};
