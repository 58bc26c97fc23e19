//! Parent Dashboard
//!
//! Everything the parent landing page shows, loaded through one call.

use serde::Serialize;

use crate::model::{Notification, Parent, Student};
use crate::storage::{StorageBackend, StorageResult};

/// A parent's profile with their children and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentDashboard {
    /// Profile; the password hash is never serialized.
    pub parent: Parent,
    /// Children, ascending by surrogate id.
    pub students: Vec<Student>,
    /// Newest first.
    pub notifications: Vec<Notification>,
    /// Notifications not yet marked read.
    pub unread_count: usize,
}

impl ParentDashboard {
    /// Load the dashboard for the parent with surrogate id `parent_id`.
    ///
    /// Returns `Ok(None)` when no such parent exists.
    pub async fn load(
        store: &dyn StorageBackend,
        parent_id: i64,
    ) -> StorageResult<Option<Self>> {
        let Some(parent) = store.get_parent(parent_id).await? else {
            return Ok(None);
        };

        let students = store.get_students_by_parent(parent_id).await?;
        let notifications = store.get_notifications_by_parent(parent_id).await?;
        let unread_count = notifications.iter().filter(|n| !n.is_read).count();

        // Postcondition
        assert!(unread_count <= notifications.len());

        Ok(Some(Self {
            parent,
            students,
            notifications,
            unread_count,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;
    use crate::model::{
        Address, EmergencyContact, Guardian, NewNotification, NewParent, NewSchool, NewStudent,
        SchoolAdmin,
    };
    use crate::storage::MemoryBackend;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    fn new_parent(email: &str) -> NewParent {
        NewParent {
            email: email.to_string(),
            password: "Password123".to_string(),
            father: Guardian::new("Khalid", "Doctor", "+966 55 111 2222"),
            mother: Guardian::new("Noura", "Architect", "+966 55 333 4444"),
            current_address: Address::new("45 Olaya Street", "Riyadh", "Riyadh", "11564"),
            permanent_address: None,
            emergency: EmergencyContact::new("Saad", "Brother", "+966 55 555 6666"),
        }
    }

    fn new_school() -> NewSchool {
        NewSchool {
            name: "Riyadh International School".to_string(),
            establishment_year: 1998,
            email: "info@ris.example.com".to_string(),
            phone: "+966 11 000 0000".to_string(),
            website: None,
            address: Address::new("1 School Road", "Riyadh", "Riyadh", "11111"),
            admin: SchoolAdmin::new(
                "Huda",
                "Principal",
                "huda@ris.example.com",
                "+966 11 000 0001",
            ),
            school_type: "Private".to_string(),
            education_level: "K-12".to_string(),
            language: "English".to_string(),
            capacity: 1200,
        }
    }

    fn notification(parent_id: i64, title: &str) -> NewNotification {
        NewNotification {
            parent_id: Some(parent_id),
            school_id: None,
            title: title.to_string(),
            description: format!("{title} details"),
            notification_type: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_parent_is_none() {
        let store = MemoryBackend::new();
        assert!(ParentDashboard::load(&store, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dashboard_collects_children_and_notifications() {
        let clock = SimClock::at(Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap());
        let store = MemoryBackend::with_clock(Arc::new(clock.clone()));

        let parent = store.create_parent(new_parent("khalid@example.com")).await.unwrap();
        let other = store.create_parent(new_parent("other@example.com")).await.unwrap();
        let school = store.create_school(new_school()).await.unwrap();

        for first_name in ["Omar", "Lina"] {
            store
                .create_student(NewStudent {
                    parent_id: parent.id,
                    school_id: school.id,
                    first_name: first_name.to_string(),
                    last_name: "Al-Harbi".to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(2015, 3, 14).unwrap(),
                    gender: "Male".to_string(),
                    grade: "Grade 4".to_string(),
                    section: Some("A".to_string()),
                    enrollment_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                    status: None,
                })
                .await
                .unwrap();
        }

        let first = store
            .create_notification(notification(parent.id, "Welcome"))
            .await
            .unwrap();
        clock.advance(Duration::minutes(5));
        store
            .create_notification(notification(parent.id, "Fees due"))
            .await
            .unwrap();
        store
            .create_notification(notification(other.id, "Not yours"))
            .await
            .unwrap();
        store.mark_notification_read(first.id).await.unwrap();

        let dashboard = ParentDashboard::load(&store, parent.id).await.unwrap().unwrap();

        assert_eq!(dashboard.parent.id, parent.id);
        assert_eq!(dashboard.students.len(), 2);
        let titles: Vec<&str> = dashboard
            .notifications
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Fees due", "Welcome"]);
        assert_eq!(dashboard.unread_count, 1);
    }

    #[tokio::test]
    async fn test_dashboard_json_omits_password_hash() {
        let store = MemoryBackend::new();
        let parent = store.create_parent(new_parent("json@example.com")).await.unwrap();

        let dashboard = ParentDashboard::load(&store, parent.id).await.unwrap().unwrap();
        let json = serde_json::to_string(&dashboard).unwrap();

        assert!(!json.contains(&parent.password_hash));
        assert!(json.contains("\"unread_count\":0"));
    }
}
