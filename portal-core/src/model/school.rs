//! School records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, SchoolAdmin};

/// A registered school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// Surrogate id
    pub id: i64,
    /// Business identifier, `SC-YYNNNN`
    pub school_id: String,
    /// Display name
    pub name: String,
    /// Year the school opened
    pub establishment_year: i32,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Website, if any
    pub website: Option<String>,
    /// Postal address
    pub address: Address,
    /// Administrator contact
    pub admin: SchoolAdmin,
    /// e.g. "international", "private"
    pub school_type: String,
    /// e.g. "k12", "primary"
    pub education_level: String,
    /// Language of instruction
    pub language: String,
    /// Student capacity
    pub capacity: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchool {
    /// Display name
    pub name: String,
    /// Year the school opened
    pub establishment_year: i32,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Website, if any
    pub website: Option<String>,
    /// Postal address
    pub address: Address,
    /// Administrator contact
    pub admin: SchoolAdmin,
    /// School type
    pub school_type: String,
    /// Education level
    pub education_level: String,
    /// Language of instruction
    pub language: String,
    /// Student capacity
    pub capacity: i32,
}

impl NewSchool {
    /// Build the stored record.
    pub(crate) fn into_record(
        self,
        id: i64,
        school_id: String,
        now: DateTime<Utc>,
    ) -> School {
        School {
            id,
            school_id,
            name: self.name,
            establishment_year: self.establishment_year,
            email: self.email,
            phone: self.phone,
            website: self.website,
            address: self.address,
            admin: self.admin,
            school_type: self.school_type,
            education_level: self.education_level,
            language: self.language,
            capacity: self.capacity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a school. The business identifier cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolUpdate {
    /// New name
    pub name: Option<String>,
    /// New establishment year
    pub establishment_year: Option<i32>,
    /// New email
    pub email: Option<String>,
    /// New phone
    pub phone: Option<String>,
    /// `Some(None)` clears the website
    pub website: Option<Option<String>>,
    /// New address
    pub address: Option<Address>,
    /// New administrator
    pub admin: Option<SchoolAdmin>,
    /// New school type
    pub school_type: Option<String>,
    /// New education level
    pub education_level: Option<String>,
    /// New language
    pub language: Option<String>,
    /// New capacity
    pub capacity: Option<i32>,
}

impl SchoolUpdate {
    /// Merge into `school` and refresh `updated_at`.
    pub fn apply(self, school: &mut School, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            school.name = name;
        }
        if let Some(year) = self.establishment_year {
            school.establishment_year = year;
        }
        if let Some(email) = self.email {
            school.email = email;
        }
        if let Some(phone) = self.phone {
            school.phone = phone;
        }
        if let Some(website) = self.website {
            school.website = website;
        }
        if let Some(address) = self.address {
            school.address = address;
        }
        if let Some(admin) = self.admin {
            school.admin = admin;
        }
        if let Some(school_type) = self.school_type {
            school.school_type = school_type;
        }
        if let Some(level) = self.education_level {
            school.education_level = level;
        }
        if let Some(language) = self.language {
            school.language = language;
        }
        if let Some(capacity) = self.capacity {
            school.capacity = capacity;
        }
        school.updated_at = now;
    }
}
