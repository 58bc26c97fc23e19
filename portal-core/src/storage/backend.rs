//! Storage Backend Trait
//!
//! TigerStyle: Abstract interface for portal records.
//!
//! Both implementations must satisfy the same contract; the suite in
//! `tests/store_contract.rs` runs against each of them.

use async_trait::async_trait;

use super::error::StorageResult;
use crate::model::{
    NewNotification, NewParent, NewSchool, NewStudent, Notification, Parent, ParentUpdate,
    School, SchoolUpdate, Student,
};
use crate::password;

/// Which implementation is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Process-local maps
    Memory,
    /// Postgres through sqlx
    Postgres,
}

impl BackendKind {
    /// Get string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Abstract storage backend for schools, parents, students and notifications.
///
/// TigerStyle: All operations are async, return explicit errors.
/// Absent records are `Ok(None)`, never an error.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    // -------------------------------------------------------------------------
    // Schools
    // -------------------------------------------------------------------------

    /// Get a school by surrogate id.
    async fn get_school(&self, id: i64) -> StorageResult<Option<School>>;

    /// Get a school by its `SC-` identifier.
    async fn get_school_by_school_id(&self, school_id: &str) -> StorageResult<Option<School>>;

    /// All schools, ascending by surrogate id.
    async fn get_all_schools(&self) -> StorageResult<Vec<School>>;

    /// Number of registered schools.
    async fn count_schools(&self) -> StorageResult<usize>;

    /// Register a school, assigning surrogate id, `SC-` identifier and timestamps.
    async fn create_school(&self, school: NewSchool) -> StorageResult<School>;

    /// Merge `update` into a school. `None` if the id is unknown.
    async fn update_school(&self, id: i64, update: SchoolUpdate)
        -> StorageResult<Option<School>>;

    // -------------------------------------------------------------------------
    // Parents
    // -------------------------------------------------------------------------

    /// Get a parent by surrogate id.
    async fn get_parent(&self, id: i64) -> StorageResult<Option<Parent>>;

    /// Get a parent by its `PO-` identifier.
    async fn get_parent_by_parent_id(&self, parent_id: &str) -> StorageResult<Option<Parent>>;

    /// Get a parent by login email.
    async fn get_parent_by_email(&self, email: &str) -> StorageResult<Option<Parent>>;

    /// Get the unverified parent holding `token`.
    async fn get_parent_by_verification_token(&self, token: &str)
        -> StorageResult<Option<Parent>>;

    /// All parents, ascending by surrogate id.
    async fn get_all_parents(&self) -> StorageResult<Vec<Parent>>;

    /// Register a parent: next `PO-` identifier, hashed password, fresh
    /// verification token.
    ///
    /// Fails with `AlreadyExists` if the email is taken.
    async fn create_parent(&self, parent: NewParent) -> StorageResult<Parent>;

    /// Merge `update` into a parent. `None` if the id is unknown.
    async fn update_parent(&self, id: i64, update: ParentUpdate)
        -> StorageResult<Option<Parent>>;

    /// Mark verified and clear the token. Idempotent.
    async fn verify_parent(&self, id: i64) -> StorageResult<Option<Parent>>;

    /// Replace the token of an unverified parent. Verified parents are
    /// returned unchanged.
    async fn reissue_verification_token(&self, id: i64) -> StorageResult<Option<Parent>>;

    // -------------------------------------------------------------------------
    // Students
    // -------------------------------------------------------------------------

    /// Get a student by surrogate id.
    async fn get_student(&self, id: i64) -> StorageResult<Option<Student>>;

    /// Get a student by its `STU-` identifier.
    async fn get_student_by_student_id(&self, student_id: &str)
        -> StorageResult<Option<Student>>;

    /// All students, ascending by surrogate id.
    async fn get_all_students(&self) -> StorageResult<Vec<Student>>;

    /// Children of one parent.
    async fn get_students_by_parent(&self, parent_id: i64) -> StorageResult<Vec<Student>>;

    /// Students enrolled at one school.
    async fn get_students_by_school(&self, school_id: i64) -> StorageResult<Vec<Student>>;

    /// Enroll a student. Fails with `InvalidReference` if the parent or
    /// school does not exist.
    async fn create_student(&self, student: NewStudent) -> StorageResult<Student>;

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Get a notification by surrogate id.
    async fn get_notification(&self, id: i64) -> StorageResult<Option<Notification>>;

    /// All notifications, ascending by surrogate id.
    async fn get_all_notifications(&self) -> StorageResult<Vec<Notification>>;

    /// Notifications addressed to a parent, newest first.
    async fn get_notifications_by_parent(&self, parent_id: i64)
        -> StorageResult<Vec<Notification>>;

    /// Post a notification, unread.
    async fn create_notification(&self, notification: NewNotification)
        -> StorageResult<Notification>;

    /// Set `is_read`. Idempotent.
    async fn mark_notification_read(&self, id: i64) -> StorageResult<Option<Notification>>;

    // -------------------------------------------------------------------------
    // Utility
    // -------------------------------------------------------------------------

    /// Whether `plain` matches a stored password hash. No side effects.
    fn verify_password(&self, plain: &str, hash: &str) -> bool {
        password::verify_password(plain, hash)
    }
}
