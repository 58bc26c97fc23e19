//! Student records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::STUDENT_STATUS_DEFAULT;

/// An enrolled student. Belongs to one parent and one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Surrogate id
    pub id: i64,
    /// Business identifier, `STU-YYNNNN`
    pub student_id: String,
    /// Surrogate id of the parent
    pub parent_id: i64,
    /// Surrogate id of the school
    pub school_id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Gender
    pub gender: String,
    /// Grade, e.g. "6"
    pub grade: String,
    /// Section within the grade
    pub section: Option<String>,
    /// First day at the school
    pub enrollment_date: NaiveDate,
    /// Enrollment status
    pub status: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for enrolling a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Surrogate id of the parent
    pub parent_id: i64,
    /// Surrogate id of the school
    pub school_id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Gender
    pub gender: String,
    /// Grade
    pub grade: String,
    /// Section within the grade
    pub section: Option<String>,
    /// First day at the school
    pub enrollment_date: NaiveDate,
    /// Status; "Active" when absent
    pub status: Option<String>,
}

impl NewStudent {
    /// Build the stored record.
    pub(crate) fn into_record(
        self,
        id: i64,
        student_id: String,
        now: DateTime<Utc>,
    ) -> Student {
        Student {
            id,
            student_id,
            parent_id: self.parent_id,
            school_id: self.school_id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            grade: self.grade,
            section: self.section,
            enrollment_date: self.enrollment_date,
            status: self
                .status
                .unwrap_or_else(|| STUDENT_STATUS_DEFAULT.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}
