//! Storage contract shared by every backend.
//!
//! Each case is written once against `&dyn StorageBackend` and run on a
//! fresh `MemoryBackend`. With the `postgres` feature and `TEST_POSTGRES_URL`
//! set, the same case runs against a truncated Postgres database.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use tokio_test::{assert_err, assert_ok};

use portal_core::{
    Address, EmergencyContact, EntityKind, Guardian, MemoryBackend, NewNotification, NewParent,
    NewSchool, NewStudent, ParentUpdate, SchoolAdmin, SchoolUpdate, SimClock, StorageBackend,
    StorageError,
};

// =============================================================================
// Fixtures
// =============================================================================

fn start_clock() -> SimClock {
    SimClock::at(Utc.with_ymd_and_hms(2025, 5, 10, 9, 30, 0).unwrap())
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("portal_core=debug")
        .with_test_writer()
        .try_init();
}

fn new_parent(email: &str) -> NewParent {
    NewParent {
        email: email.to_string(),
        password: "Password123".to_string(),
        father: Guardian::new("Mohammed Al-Saud", "Engineer", "+966 50 123 4567"),
        mother: Guardian::new("Fatima Al-Saud", "Teacher", "+966 50 765 4321"),
        current_address: Address::new("123 King Fahd Road", "Riyadh", "Riyadh", "12345")
            .with_line2("Al Olaya District"),
        permanent_address: None,
        emergency: EmergencyContact::new("Abdullah Al-Saud", "Uncle", "+966 50 111 2222"),
    }
}

fn new_school(name: &str) -> NewSchool {
    NewSchool {
        name: name.to_string(),
        establishment_year: 2005,
        email: "admin@school.example.com".to_string(),
        phone: "+966 11 234 5678".to_string(),
        website: Some("https://school.example.com".to_string()),
        address: Address::new("789 Education Street", "Riyadh", "Riyadh", "12347"),
        admin: SchoolAdmin::new(
            "Dr. Ahmed Hassan",
            "Principal",
            "principal@school.example.com",
            "+966 11 234 5679",
        ),
        school_type: "Private".to_string(),
        education_level: "K-12".to_string(),
        language: "English".to_string(),
        capacity: 1000,
    }
}

fn new_student(parent_id: i64, school_id: i64, first_name: &str) -> NewStudent {
    NewStudent {
        parent_id,
        school_id,
        first_name: first_name.to_string(),
        last_name: "Al-Saud".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2016, 2, 29).unwrap(),
        gender: "Female".to_string(),
        grade: "Grade 3".to_string(),
        section: Some("B".to_string()),
        enrollment_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        status: None,
    }
}

fn new_notification(parent_id: Option<i64>, title: &str) -> NewNotification {
    NewNotification {
        parent_id,
        school_id: None,
        title: title.to_string(),
        description: format!("{title} for this week"),
        notification_type: "announcement".to_string(),
    }
}

// =============================================================================
// Harness
// =============================================================================

fn memory_store() -> (MemoryBackend, SimClock) {
    let clock = start_clock();
    (MemoryBackend::with_clock(Arc::new(clock.clone())), clock)
}

#[cfg(feature = "postgres")]
mod pg {
    use super::*;
    use portal_core::{DatabaseConfig, PostgresBackend, RetryPolicy};
    use std::sync::OnceLock;
    use tokio::sync::{Mutex, MutexGuard};

    // Cases share one database and run one at a time.
    static DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    pub async fn store() -> Option<(PostgresBackend, SimClock, MutexGuard<'static, ()>)> {
        let Ok(url) = std::env::var("TEST_POSTGRES_URL") else {
            eprintln!("Skipping test: TEST_POSTGRES_URL not set");
            return None;
        };

        let guard = DB_LOCK.get_or_init(|| Mutex::new(())).lock().await;
        let clock = start_clock();
        let backend = PostgresBackend::connect(&DatabaseConfig::default().with_url(url))
            .await
            .unwrap()
            .with_retry(RetryPolicy::no_retry())
            .with_clock(Arc::new(clock.clone()));
        backend.clear().await.unwrap();

        Some((backend, clock, guard))
    }
}

/// Run a contract case against every available backend.
macro_rules! contract {
    ($($case:ident),* $(,)?) => {
        $(
            mod $case {
                use super::*;

                #[tokio::test]
                async fn memory() {
                    init_logging();
                    let (store, clock) = memory_store();
                    super::$case(&store, &clock).await;
                }

                #[cfg(feature = "postgres")]
                #[tokio::test]
                async fn postgres() {
                    init_logging();
                    let Some((store, clock, _guard)) = pg::store().await else {
                        return;
                    };
                    super::$case(&store, &clock).await;
                    store.close().await;
                }
            }
        )*
    };
}

contract!(
    parent_ids_are_sequential_within_a_month,
    parent_ids_restart_each_month,
    absent_records_are_none,
    create_then_get_round_trips,
    verify_parent_is_idempotent,
    reissue_token_only_while_unverified,
    mark_read_is_idempotent,
    passwords_are_hashed,
    duplicate_email_is_a_conflict,
    school_and_student_ids_use_counts,
    dangling_references_are_rejected,
    updates_merge_supplied_fields,
    notifications_newest_first,
);

// =============================================================================
// Cases
// =============================================================================

async fn parent_ids_are_sequential_within_a_month(store: &dyn StorageBackend, _clock: &SimClock) {
    let mut issued = Vec::new();
    for i in 1..=3 {
        let email = format!("p{i}@example.com");
        let parent = assert_ok!(store.create_parent(new_parent(&email)).await);
        issued.push(parent.parent_id);
    }

    assert_eq!(
        issued,
        vec!["PO-2025-May-00001", "PO-2025-May-00002", "PO-2025-May-00003"]
    );
}

async fn parent_ids_restart_each_month(store: &dyn StorageBackend, clock: &SimClock) {
    let may = assert_ok!(store.create_parent(new_parent("may@example.com")).await);
    assert_eq!(may.parent_id, "PO-2025-May-00001");

    clock.set(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 1).unwrap());
    let june = assert_ok!(store.create_parent(new_parent("june@example.com")).await);
    let june2 = assert_ok!(store.create_parent(new_parent("june2@example.com")).await);

    assert_eq!(june.parent_id, "PO-2025-Jun-00001");
    assert_eq!(june2.parent_id, "PO-2025-Jun-00002");
}

async fn absent_records_are_none(store: &dyn StorageBackend, _clock: &SimClock) {
    assert_eq!(assert_ok!(store.get_school(404).await), None);
    assert_eq!(assert_ok!(store.get_school_by_school_id("SC-250404").await), None);
    assert_eq!(assert_ok!(store.get_parent(404).await), None);
    assert_eq!(assert_ok!(store.get_parent_by_parent_id("PO-2025-May-00404").await), None);
    assert_eq!(assert_ok!(store.get_parent_by_email("nobody@example.com").await), None);
    assert_eq!(assert_ok!(store.get_parent_by_verification_token("no-such-token").await), None);
    assert_eq!(assert_ok!(store.get_student(404).await), None);
    assert_eq!(assert_ok!(store.get_student_by_student_id("STU-250404").await), None);
    assert_eq!(assert_ok!(store.get_notification(404).await), None);

    assert_eq!(assert_ok!(store.update_school(404, SchoolUpdate::default()).await), None);
    assert_eq!(assert_ok!(store.update_parent(404, ParentUpdate::default()).await), None);
    assert_eq!(assert_ok!(store.verify_parent(404).await), None);
    assert_eq!(assert_ok!(store.reissue_verification_token(404).await), None);
    assert_eq!(assert_ok!(store.mark_notification_read(404).await), None);

    assert!(assert_ok!(store.get_students_by_parent(404).await).is_empty());
    assert!(assert_ok!(store.get_notifications_by_parent(404).await).is_empty());
    assert_eq!(assert_ok!(store.count_schools().await), 0);
}

async fn create_then_get_round_trips(store: &dyn StorageBackend, _clock: &SimClock) {
    let school = assert_ok!(store.create_school(new_school("Al Noor Academy")).await);
    assert_eq!(assert_ok!(store.get_school(school.id).await), Some(school.clone()));
    assert_eq!(
        assert_ok!(store.get_school_by_school_id(&school.school_id).await),
        Some(school.clone())
    );

    let parent = assert_ok!(store.create_parent(new_parent("roundtrip@example.com")).await);
    assert_eq!(assert_ok!(store.get_parent(parent.id).await), Some(parent.clone()));
    assert_eq!(
        assert_ok!(store.get_parent_by_parent_id(&parent.parent_id).await),
        Some(parent.clone())
    );
    assert_eq!(
        assert_ok!(store.get_parent_by_email("roundtrip@example.com").await),
        Some(parent.clone())
    );
    assert!(!parent.is_verified);
    assert_eq!(parent.permanent_address, parent.current_address);

    let student = assert_ok!(store.create_student(new_student(parent.id, school.id, "Sara")).await);
    assert_eq!(student.status, "Active");
    assert_eq!(assert_ok!(store.get_student(student.id).await), Some(student.clone()));
    assert_eq!(
        assert_ok!(store.get_student_by_student_id(&student.student_id).await),
        Some(student.clone())
    );
    assert_eq!(assert_ok!(store.get_students_by_parent(parent.id).await), vec![student.clone()]);
    assert_eq!(assert_ok!(store.get_students_by_school(school.id).await), vec![student.clone()]);
    assert_eq!(assert_ok!(store.get_all_students().await), vec![student]);

    let welcome = new_notification(Some(parent.id), "Welcome");
    let notification = assert_ok!(store.create_notification(welcome).await);
    assert!(!notification.is_read);
    assert_eq!(
        assert_ok!(store.get_notification(notification.id).await),
        Some(notification.clone())
    );
    assert_eq!(assert_ok!(store.get_all_notifications().await), vec![notification]);

    assert_eq!(assert_ok!(store.get_all_schools().await), vec![school]);
    assert_eq!(assert_ok!(store.get_all_parents().await), vec![parent]);
    assert_eq!(assert_ok!(store.count_schools().await), 1);
}

async fn verify_parent_is_idempotent(store: &dyn StorageBackend, clock: &SimClock) {
    let parent = assert_ok!(store.create_parent(new_parent("verify@example.com")).await);
    let token = parent.verification_token.clone().unwrap();

    let found = assert_ok!(store.get_parent_by_verification_token(&token).await);
    assert_eq!(found.map(|p| p.id), Some(parent.id));

    clock.advance(Duration::minutes(10));
    let verified = assert_ok!(store.verify_parent(parent.id).await).unwrap();
    assert!(verified.is_verified);
    assert_eq!(verified.verification_token, None);
    assert!(verified.updated_at > parent.updated_at);

    let again = assert_ok!(store.verify_parent(parent.id).await).unwrap();
    assert!(again.is_verified);
    assert_eq!(again.verification_token, None);

    assert_eq!(assert_ok!(store.get_parent_by_verification_token(&token).await), None);
}

async fn reissue_token_only_while_unverified(store: &dyn StorageBackend, _clock: &SimClock) {
    let parent = assert_ok!(store.create_parent(new_parent("resend@example.com")).await);
    let first = parent.verification_token.clone().unwrap();

    let reissued = assert_ok!(store.reissue_verification_token(parent.id).await).unwrap();
    let second = reissued.verification_token.clone().unwrap();
    assert_ne!(first, second);
    assert_eq!(assert_ok!(store.get_parent_by_verification_token(&first).await), None);

    assert_ok!(store.verify_parent(parent.id).await);
    let after = assert_ok!(store.reissue_verification_token(parent.id).await).unwrap();
    assert!(after.is_verified);
    assert_eq!(after.verification_token, None);
}

async fn mark_read_is_idempotent(store: &dyn StorageBackend, _clock: &SimClock) {
    let holiday = new_notification(None, "Holiday");
    let notification = assert_ok!(store.create_notification(holiday).await);

    let read = assert_ok!(store.mark_notification_read(notification.id).await).unwrap();
    assert!(read.is_read);

    let again = assert_ok!(store.mark_notification_read(notification.id).await).unwrap();
    assert_eq!(again, read);
}

async fn passwords_are_hashed(store: &dyn StorageBackend, _clock: &SimClock) {
    let parent = assert_ok!(store.create_parent(new_parent("hash@example.com")).await);

    assert_ne!(parent.password_hash, "Password123");
    assert!(store.verify_password("Password123", &parent.password_hash));
    assert!(!store.verify_password("password123", &parent.password_hash));

    let updated = assert_ok!(
        store
            .update_parent(
                parent.id,
                ParentUpdate {
                    password: Some("N3wSecret".to_string()),
                    ..Default::default()
                },
            )
            .await
    )
    .unwrap();
    assert!(store.verify_password("N3wSecret", &updated.password_hash));
    assert!(!store.verify_password("Password123", &updated.password_hash));
}

async fn duplicate_email_is_a_conflict(store: &dyn StorageBackend, _clock: &SimClock) {
    assert_ok!(store.create_parent(new_parent("parent@example.com")).await);

    let err = assert_err!(store.create_parent(new_parent("parent@example.com")).await);
    assert!(err.is_conflict(), "expected conflict, got {err}");
    assert!(matches!(
        err,
        StorageError::AlreadyExists {
            entity: EntityKind::Parent,
            ..
        }
    ));

    assert_eq!(assert_ok!(store.get_all_parents().await).len(), 1);

    // The losing create consumes no identifier.
    let next = assert_ok!(store.create_parent(new_parent("other@example.com")).await);
    assert_eq!(next.parent_id, "PO-2025-May-00002");
}

async fn school_and_student_ids_use_counts(store: &dyn StorageBackend, _clock: &SimClock) {
    let first = assert_ok!(store.create_school(new_school("First School")).await);
    let second = assert_ok!(store.create_school(new_school("Second School")).await);
    assert_eq!(first.school_id, "SC-250001");
    assert_eq!(second.school_id, "SC-250002");

    let parent = assert_ok!(store.create_parent(new_parent("kids@example.com")).await);
    let a = assert_ok!(store.create_student(new_student(parent.id, first.id, "Reem")).await);
    let b = assert_ok!(store.create_student(new_student(parent.id, second.id, "Faisal")).await);
    assert_eq!(a.student_id, "STU-250001");
    assert_eq!(b.student_id, "STU-250002");
}

async fn dangling_references_are_rejected(store: &dyn StorageBackend, _clock: &SimClock) {
    let school = assert_ok!(store.create_school(new_school("Referenced School")).await);
    let parent = assert_ok!(store.create_parent(new_parent("ref@example.com")).await);

    let err = assert_err!(store.create_student(new_student(9_999, school.id, "Ghost")).await);
    assert_eq!(err, StorageError::invalid_reference(EntityKind::Parent, 9_999));

    let err = assert_err!(store.create_student(new_student(parent.id, 9_999, "Ghost")).await);
    assert_eq!(err, StorageError::invalid_reference(EntityKind::School, 9_999));

    let err = assert_err!(store.create_notification(new_notification(Some(9_999), "Lost")).await);
    assert_eq!(err, StorageError::invalid_reference(EntityKind::Parent, 9_999));

    assert!(assert_ok!(store.get_all_students().await).is_empty());
    assert!(assert_ok!(store.get_all_notifications().await).is_empty());
}

async fn updates_merge_supplied_fields(store: &dyn StorageBackend, clock: &SimClock) {
    let school = assert_ok!(store.create_school(new_school("Old Name")).await);
    clock.advance(Duration::hours(1));

    let updated = assert_ok!(
        store
            .update_school(
                school.id,
                SchoolUpdate {
                    name: Some("New Name".to_string()),
                    website: Some(None),
                    capacity: Some(1500),
                    ..Default::default()
                },
            )
            .await
    )
    .unwrap();

    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.website, None);
    assert_eq!(updated.capacity, 1500);
    assert_eq!(updated.school_id, school.school_id);
    assert_eq!(updated.email, school.email);
    assert_eq!(updated.created_at, school.created_at);
    assert!(updated.updated_at > school.updated_at);
    assert_eq!(assert_ok!(store.get_school(school.id).await), Some(updated));

    let parent = assert_ok!(store.create_parent(new_parent("before@example.com")).await);
    let moved = Address::new("9 Corniche Road", "Jeddah", "Makkah", "21577");
    let updated = assert_ok!(
        store
            .update_parent(
                parent.id,
                ParentUpdate {
                    email: Some("after@example.com".to_string()),
                    current_address: Some(moved.clone()),
                    ..Default::default()
                },
            )
            .await
    )
    .unwrap();

    assert_eq!(updated.email, "after@example.com");
    assert_eq!(updated.current_address, moved);
    assert_eq!(updated.permanent_address, parent.permanent_address);
    assert_eq!(updated.password_hash, parent.password_hash);
    assert_eq!(assert_ok!(store.get_parent_by_email("before@example.com").await), None);
}

async fn notifications_newest_first(store: &dyn StorageBackend, clock: &SimClock) {
    let parent = assert_ok!(store.create_parent(new_parent("inbox@example.com")).await);
    let other = assert_ok!(store.create_parent(new_parent("elsewhere@example.com")).await);

    for title in ["First", "Second", "Third"] {
        assert_ok!(store.create_notification(new_notification(Some(parent.id), title)).await);
        clock.advance(Duration::seconds(30));
    }
    assert_ok!(store.create_notification(new_notification(Some(other.id), "Other")).await);

    let titles: Vec<String> = assert_ok!(store.get_notifications_by_parent(parent.id).await)
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}
