//! `MemoryBackend` - In-Process Storage
//!
//! `TigerStyle`: the reference implementation of `StorageBackend`.
//!
//! Used when no database is configured, and by tests that want a fresh store
//! per case. All four tables and their counters sit behind one `RwLock`, so a
//! create (read last id, generate, insert) is a single critical section.
//! Contents are lost when the process exits.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::backend::{BackendKind, StorageBackend};
use super::error::{StorageError, StorageResult};
use crate::clock::{Clock, SystemClock};
use crate::ids;
use crate::model::{
    EntityKind, NewNotification, NewParent, NewSchool, NewStudent, Notification, Parent,
    ParentUpdate, School, SchoolUpdate, Student,
};

// =============================================================================
// Tables
// =============================================================================

/// Per-entity ordered maps keyed by surrogate id, plus the last id handed out.
#[derive(Debug, Default)]
struct Tables {
    schools: BTreeMap<i64, School>,
    parents: BTreeMap<i64, Parent>,
    students: BTreeMap<i64, Student>,
    notifications: BTreeMap<i64, Notification>,
    school_seq: i64,
    parent_seq: i64,
    student_seq: i64,
    notification_seq: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.parents
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }

    fn require_parent(&self, id: i64) -> StorageResult<()> {
        if self.parents.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::invalid_reference(EntityKind::Parent, id))
        }
    }

    fn require_school(&self, id: i64) -> StorageResult<()> {
        if self.schools.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::invalid_reference(EntityKind::School, id))
        }
    }
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

// =============================================================================
// MemoryBackend
// =============================================================================

/// In-memory storage backend.
///
/// `TigerStyle`:
/// - Time from an injected `Clock`
/// - Thread-safe with `RwLock`, never held across an await
/// - Clones share the same tables
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            clock,
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StorageError::internal("memory tables lock poisoned"))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StorageError::internal("memory tables lock poisoned"))
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    // -------------------------------------------------------------------------
    // Schools
    // -------------------------------------------------------------------------

    async fn get_school(&self, id: i64) -> StorageResult<Option<School>> {
        Ok(self.read()?.schools.get(&id).cloned())
    }

    async fn get_school_by_school_id(&self, school_id: &str) -> StorageResult<Option<School>> {
        Ok(self
            .read()?
            .schools
            .values()
            .find(|s| s.school_id == school_id)
            .cloned())
    }

    async fn get_all_schools(&self) -> StorageResult<Vec<School>> {
        Ok(self.read()?.schools.values().cloned().collect())
    }

    async fn count_schools(&self) -> StorageResult<usize> {
        Ok(self.read()?.schools.len())
    }

    #[tracing::instrument(skip(self, school), fields(name = %school.name))]
    async fn create_school(&self, school: NewSchool) -> StorageResult<School> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        let school_id = ids::school_id(tables.schools.len(), now);
        let id = next_id(&mut tables.school_seq);
        let record = school.into_record(id, school_id, now);
        tables.schools.insert(id, record.clone());

        tracing::debug!(id, school_id = %record.school_id, "school created");
        Ok(record)
    }

    async fn update_school(
        &self,
        id: i64,
        update: SchoolUpdate,
    ) -> StorageResult<Option<School>> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        let Some(school) = tables.schools.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(school, now);
        Ok(Some(school.clone()))
    }

    // -------------------------------------------------------------------------
    // Parents
    // -------------------------------------------------------------------------

    async fn get_parent(&self, id: i64) -> StorageResult<Option<Parent>> {
        Ok(self.read()?.parents.get(&id).cloned())
    }

    async fn get_parent_by_parent_id(&self, parent_id: &str) -> StorageResult<Option<Parent>> {
        Ok(self
            .read()?
            .parents
            .values()
            .find(|p| p.parent_id == parent_id)
            .cloned())
    }

    async fn get_parent_by_email(&self, email: &str) -> StorageResult<Option<Parent>> {
        Ok(self
            .read()?
            .parents
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn get_parent_by_verification_token(
        &self,
        token: &str,
    ) -> StorageResult<Option<Parent>> {
        Ok(self
            .read()?
            .parents
            .values()
            .find(|p| p.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn get_all_parents(&self) -> StorageResult<Vec<Parent>> {
        Ok(self.read()?.parents.values().cloned().collect())
    }

    #[tracing::instrument(skip(self, parent), fields(email = %parent.email))]
    async fn create_parent(&self, parent: NewParent) -> StorageResult<Parent> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        if tables.email_taken(&parent.email, None) {
            return Err(StorageError::already_exists(EntityKind::Parent, parent.email));
        }

        // Highest surrogate id is the most recently issued identifier.
        let last = tables.parents.values().next_back().map(|p| p.parent_id.as_str());
        let parent_id = ids::next_parent_id(last, now);
        let id = next_id(&mut tables.parent_seq);
        let token = uuid::Uuid::new_v4().to_string();

        let record = parent.into_record(id, parent_id, token, now);
        tables.parents.insert(id, record.clone());

        tracing::debug!(id, parent_id = %record.parent_id, "parent created");
        Ok(record)
    }

    async fn update_parent(
        &self,
        id: i64,
        update: ParentUpdate,
    ) -> StorageResult<Option<Parent>> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        if !tables.parents.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &update.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StorageError::already_exists(EntityKind::Parent, email.clone()));
            }
        }

        let Some(parent) = tables.parents.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(parent, now);
        Ok(Some(parent.clone()))
    }

    async fn verify_parent(&self, id: i64) -> StorageResult<Option<Parent>> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        let Some(parent) = tables.parents.get_mut(&id) else {
            return Ok(None);
        };
        parent.mark_verified(now);
        Ok(Some(parent.clone()))
    }

    async fn reissue_verification_token(&self, id: i64) -> StorageResult<Option<Parent>> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        let Some(parent) = tables.parents.get_mut(&id) else {
            return Ok(None);
        };
        if !parent.is_verified {
            parent.verification_token = Some(uuid::Uuid::new_v4().to_string());
            parent.updated_at = now;
        }
        Ok(Some(parent.clone()))
    }

    // -------------------------------------------------------------------------
    // Students
    // -------------------------------------------------------------------------

    async fn get_student(&self, id: i64) -> StorageResult<Option<Student>> {
        Ok(self.read()?.students.get(&id).cloned())
    }

    async fn get_student_by_student_id(
        &self,
        student_id: &str,
    ) -> StorageResult<Option<Student>> {
        Ok(self
            .read()?
            .students
            .values()
            .find(|s| s.student_id == student_id)
            .cloned())
    }

    async fn get_all_students(&self) -> StorageResult<Vec<Student>> {
        Ok(self.read()?.students.values().cloned().collect())
    }

    async fn get_students_by_parent(&self, parent_id: i64) -> StorageResult<Vec<Student>> {
        Ok(self
            .read()?
            .students
            .values()
            .filter(|s| s.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn get_students_by_school(&self, school_id: i64) -> StorageResult<Vec<Student>> {
        Ok(self
            .read()?
            .students
            .values()
            .filter(|s| s.school_id == school_id)
            .cloned()
            .collect())
    }

    #[tracing::instrument(
        skip(self, student),
        fields(parent_id = student.parent_id, school_id = student.school_id)
    )]
    async fn create_student(&self, student: NewStudent) -> StorageResult<Student> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        tables.require_parent(student.parent_id)?;
        tables.require_school(student.school_id)?;

        let student_id = ids::student_id(tables.students.len(), now);
        let id = next_id(&mut tables.student_seq);
        let record = student.into_record(id, student_id, now);
        tables.students.insert(id, record.clone());

        tracing::debug!(id, student_id = %record.student_id, "student created");
        Ok(record)
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    async fn get_notification(&self, id: i64) -> StorageResult<Option<Notification>> {
        Ok(self.read()?.notifications.get(&id).cloned())
    }

    async fn get_all_notifications(&self) -> StorageResult<Vec<Notification>> {
        Ok(self.read()?.notifications.values().cloned().collect())
    }

    async fn get_notifications_by_parent(
        &self,
        parent_id: i64,
    ) -> StorageResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .read()?
            .notifications
            .values()
            .filter(|n| n.parent_id == Some(parent_id))
            .cloned()
            .collect();

        // Newest first; id breaks ties between same-instant inserts
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> StorageResult<Notification> {
        let now = self.clock.now();
        let mut tables = self.write()?;

        if let Some(parent_id) = notification.parent_id {
            tables.require_parent(parent_id)?;
        }
        if let Some(school_id) = notification.school_id {
            tables.require_school(school_id)?;
        }

        let id = next_id(&mut tables.notification_seq);
        let record = notification.into_record(id, now);
        tables.notifications.insert(id, record.clone());
        Ok(record)
    }

    async fn mark_notification_read(&self, id: i64) -> StorageResult<Option<Notification>> {
        let mut tables = self.write()?;

        let Some(notification) = tables.notifications.get_mut(&id) else {
            return Ok(None);
        };
        notification.is_read = true;
        Ok(Some(notification.clone()))
    }
}

// =============================================================================
// Tests
// =============================================================================
