//! Model - Portal Records
//!
//! TigerStyle: explicit fields, no Option where not needed.
//!
//! Each entity has three shapes:
//! - the stored record (`School`), owned by the storage layer
//! - the create input (`NewSchool`), already validated by the caller
//! - the partial update (`SchoolUpdate`), where `None` means "keep"

mod notification;
mod parent;
mod school;
mod student;

pub use notification::{NewNotification, Notification};
pub use parent::{NewParent, Parent, ParentUpdate};
pub use school::{NewSchool, School, SchoolUpdate};
pub use student::{NewStudent, Student};

use serde::{Deserialize, Serialize};

use crate::constants::COUNTRY_DEFAULT;

// =============================================================================
// Entity Kind
// =============================================================================

/// The four record kinds owned by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Registered school
    School,
    /// Parent account
    Parent,
    /// Enrolled student
    Student,
    /// Notification shown on the dashboard
    Notification,
}

impl EntityKind {
    /// Get string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::School => "school",
            Self::Parent => "parent",
            Self::Student => "student",
            Self::Notification => "notification",
        }
    }

    /// Table holding records of this kind.
    #[must_use]
    pub fn table(&self) -> &'static str {
        match self {
            Self::School => "schools",
            Self::Parent => "parents",
            Self::Student => "students",
            Self::Notification => "notifications",
        }
    }

    /// Kind stored in `table`.
    #[must_use]
    pub fn from_table(table: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.table() == table)
    }

    /// Get all kinds in dependency order.
    #[must_use]
    pub fn all() -> &'static [EntityKind] {
        &[Self::School, Self::Parent, Self::Student, Self::Notification]
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Shared Blocks
// =============================================================================

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    pub line1: String,
    /// Apartment, district, ...
    pub line2: Option<String>,
    /// City
    pub city: String,
    /// Province or region
    pub province: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
}

impl Address {
    /// Address in the default country with no second line.
    #[must_use]
    pub fn new(
        line1: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            line1: line1.into(),
            line2: None,
            city: city.into(),
            province: province.into(),
            postal_code: postal_code.into(),
            country: COUNTRY_DEFAULT.to_string(),
        }
    }

    /// Set the second line.
    #[must_use]
    pub fn with_line2(mut self, line2: impl Into<String>) -> Self {
        self.line2 = Some(line2.into());
        self
    }

    /// Set the country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }
}

/// Father or mother contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    /// Full name
    pub name: String,
    /// Occupation
    pub occupation: String,
    /// Phone number
    pub contact: String,
}

impl Guardian {
    /// Create a guardian block.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        occupation: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            occupation: occupation.into(),
            contact: contact.into(),
        }
    }
}

/// Person to call when neither guardian is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Full name
    pub name: String,
    /// Relation to the family
    pub relation: String,
    /// Phone number
    pub contact: String,
}

impl EmergencyContact {
    /// Create an emergency contact block.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        relation: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relation: relation.into(),
            contact: contact.into(),
        }
    }
}

/// School administrator contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolAdmin {
    /// Full name
    pub name: String,
    /// Position, e.g. "Principal"
    pub position: String,
    /// Email
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl SchoolAdmin {
    /// Create an administrator block.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}
