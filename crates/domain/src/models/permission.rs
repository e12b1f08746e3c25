//! Role-based permissions.
//!
//! Every role grants a fixed permission set. Org-scoped checks (is the caller
//! a member of the organization in the path?) happen in the API layer.

use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// A single capability checked by route handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "organization:manage")]
    OrganizationManage,
    #[serde(rename = "user:manage")]
    UserManage,
    #[serde(rename = "staff:manage")]
    StaffManage,
    #[serde(rename = "court:read")]
    CourtRead,
    #[serde(rename = "court:manage")]
    CourtManage,
    #[serde(rename = "booking:read")]
    BookingRead,
    #[serde(rename = "booking:manage")]
    BookingManage,
    #[serde(rename = "event:manage")]
    EventManage,
    #[serde(rename = "package:manage")]
    PackageManage,
    #[serde(rename = "ticket:manage")]
    TicketManage,
    #[serde(rename = "advertisement:manage")]
    AdvertisementManage,
    #[serde(rename = "bank:manage")]
    BankManage,
    #[serde(rename = "dashboard:read")]
    DashboardRead,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::OrganizationManage,
        Permission::UserManage,
        Permission::StaffManage,
        Permission::CourtRead,
        Permission::CourtManage,
        Permission::BookingRead,
        Permission::BookingManage,
        Permission::EventManage,
        Permission::PackageManage,
        Permission::TicketManage,
        Permission::AdvertisementManage,
        Permission::BankManage,
        Permission::DashboardRead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::OrganizationManage => "organization:manage",
            Permission::UserManage => "user:manage",
            Permission::StaffManage => "staff:manage",
            Permission::CourtRead => "court:read",
            Permission::CourtManage => "court:manage",
            Permission::BookingRead => "booking:read",
            Permission::BookingManage => "booking:manage",
            Permission::EventManage => "event:manage",
            Permission::PackageManage => "package:manage",
            Permission::TicketManage => "ticket:manage",
            Permission::AdvertisementManage => "advertisement:manage",
            Permission::BankManage => "bank:manage",
            Permission::DashboardRead => "dashboard:read",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ARENA_ADMIN: &[Permission] = &[
    Permission::OrganizationManage,
    Permission::StaffManage,
    Permission::CourtRead,
    Permission::CourtManage,
    Permission::BookingRead,
    Permission::BookingManage,
    Permission::EventManage,
    Permission::PackageManage,
    Permission::TicketManage,
    Permission::BankManage,
    Permission::DashboardRead,
];

const SALES: &[Permission] = &[
    Permission::CourtRead,
    Permission::BookingRead,
    Permission::BookingManage,
    Permission::PackageManage,
    Permission::DashboardRead,
];

const EMPLOYEE: &[Permission] = &[
    Permission::CourtRead,
    Permission::BookingRead,
    Permission::BookingManage,
    Permission::TicketManage,
];

const EDUCATION_STAFF: &[Permission] = &[
    Permission::StaffManage,
    Permission::CourtRead,
    Permission::BookingRead,
    Permission::EventManage,
    Permission::DashboardRead,
];

const COACH: &[Permission] = &[Permission::CourtRead, Permission::BookingRead];

impl UserRole {
    /// Permissions granted by this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            UserRole::SuperAdmin => &Permission::ALL,
            UserRole::ArenaAdmin => ARENA_ADMIN,
            UserRole::Sales => SALES,
            UserRole::Employee => EMPLOYEE,
            UserRole::EducationStaff => EDUCATION_STAFF,
            UserRole::Coach => COACH,
            UserRole::Customer => &[],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Whether a holder of this role may create or re-assign a staff member
    /// with the target role.
    pub fn can_assign_staff_role(&self, target: UserRole) -> bool {
        match self {
            UserRole::SuperAdmin => target.is_staff(),
            UserRole::ArenaAdmin => matches!(
                target,
                UserRole::Sales | UserRole::Employee | UserRole::EducationStaff | UserRole::Coach
            ),
            UserRole::EducationStaff => target == UserRole::Coach,
            _ => false,
        }
    }
}
