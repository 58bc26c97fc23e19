//! Operator Commands
//!
//! Each command takes the selected store and returns what it did; `main`
//! decides how to print it.

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use portal_core::{
    Address, BackendKind, EmergencyContact, Guardian, NewNotification, NewParent, NewSchool,
    NewStudent, Parent, ParentDashboard, SchoolAdmin, StorageBackend,
};

/// Login used by the demo parent.
pub const DEMO_PARENT_EMAIL: &str = "parent@example.com";

/// Password of the demo parent.
pub const DEMO_PARENT_PASSWORD: &str = "Password123";

// =============================================================================
// check
// =============================================================================

/// Row counts per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    /// Active backend
    pub backend: &'static str,
    /// Registered schools
    pub schools: usize,
    /// Parent accounts
    pub parents: usize,
    /// Verified parent accounts
    pub parents_verified: usize,
    /// Enrolled students
    pub students: usize,
    /// Notifications
    pub notifications: usize,
}

/// Touch every table once and count what is there.
pub async fn check(store: &dyn StorageBackend, kind: BackendKind) -> anyhow::Result<StoreSummary> {
    let parents = store.get_all_parents().await.context("listing parents")?;

    Ok(StoreSummary {
        backend: kind.as_str(),
        schools: store.count_schools().await.context("counting schools")?,
        parents: parents.len(),
        parents_verified: parents.iter().filter(|p| p.is_verified).count(),
        students: store.get_all_students().await.context("listing students")?.len(),
        notifications: store
            .get_all_notifications()
            .await
            .context("listing notifications")?
            .len(),
    })
}

// =============================================================================
// seed
// =============================================================================

/// Identifiers issued by `seed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// `SC-` identifier of the demo school
    pub school_id: String,
    /// `PO-` identifier of the demo parent
    pub parent_id: String,
    /// `STU-` identifiers of the demo children
    pub student_ids: Vec<String>,
    /// Surrogate id of the welcome notification
    pub notification_id: i64,
}

/// Insert one school, one verified parent with two children, and a
/// notification. Refuses to run twice against the same store.
pub async fn seed(store: &dyn StorageBackend) -> anyhow::Result<SeedReport> {
    if store.get_parent_by_email(DEMO_PARENT_EMAIL).await?.is_some() {
        bail!("demo data already present ({DEMO_PARENT_EMAIL} exists)");
    }

    let school = store
        .create_school(demo_school())
        .await
        .context("creating demo school")?;
    tracing::info!(school_id = %school.school_id, "school created");

    let parent = store
        .create_parent(demo_parent())
        .await
        .context("creating demo parent")?;
    store
        .verify_parent(parent.id)
        .await?
        .ok_or_else(|| anyhow!("demo parent {} vanished", parent.parent_id))?;
    tracing::info!(parent_id = %parent.parent_id, "parent created and verified");

    let mut student_ids = Vec::new();
    for (first_name, born, gender, grade, section) in [
        ("Ahmad", (2010, 6, 15), "male", "6", "A"),
        ("Sara", (2012, 9, 22), "female", "4", "B"),
    ] {
        let student = store
            .create_student(NewStudent {
                parent_id: parent.id,
                school_id: school.id,
                first_name: first_name.to_string(),
                last_name: "Al-Abdullah".to_string(),
                date_of_birth: date(born)?,
                gender: gender.to_string(),
                grade: grade.to_string(),
                section: Some(section.to_string()),
                enrollment_date: date((2022, 9, 1))?,
                status: Some("active".to_string()),
            })
            .await
            .with_context(|| format!("creating student {first_name}"))?;
        tracing::info!(student_id = %student.student_id, "student created");
        student_ids.push(student.student_id);
    }

    let notification = store
        .create_notification(NewNotification {
            parent_id: Some(parent.id),
            school_id: Some(school.id),
            title: "Parent-Teacher Meeting".to_string(),
            description:
                "Please attend the upcoming parent-teacher meeting on October 15th at 5 PM."
                    .to_string(),
            notification_type: "event".to_string(),
        })
        .await
        .context("creating demo notification")?;

    Ok(SeedReport {
        school_id: school.school_id,
        parent_id: parent.parent_id,
        student_ids,
        notification_id: notification.id,
    })
}

fn date((year, month, day): (i32, u32, u32)) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("invalid date {year}-{month}-{day}"))
}

fn demo_school() -> NewSchool {
    NewSchool {
        name: "Al-Riyadh International School".to_string(),
        establishment_year: 2005,
        email: "info@riyadh-school.edu.sa".to_string(),
        phone: "+966 11 123 4567".to_string(),
        website: Some("https://riyadh-school.edu.sa".to_string()),
        address: Address::new("King Fahd Road", "Riyadh", "Riyadh", "12345")
            .with_line2("Al Olaya District"),
        admin: SchoolAdmin::new(
            "Ahmed Al-Saud",
            "Principal",
            "principal@riyadh-school.edu.sa",
            "+966 11 123 4568",
        ),
        school_type: "international".to_string(),
        education_level: "k12".to_string(),
        language: "dual".to_string(),
        capacity: 1500,
    }
}

fn demo_parent() -> NewParent {
    NewParent {
        email: DEMO_PARENT_EMAIL.to_string(),
        password: DEMO_PARENT_PASSWORD.to_string(),
        father: Guardian::new("Mohammed Al-Abdullah", "Engineer", "+966 50 123 4567"),
        mother: Guardian::new("Fatima Al-Abdullah", "Teacher", "+966 50 123 4568"),
        current_address: Address::new("123 Tahlia Street", "Riyadh", "Riyadh", "12345")
            .with_line2("Apartment 4B"),
        permanent_address: None,
        emergency: EmergencyContact::new("Abdullah Al-Mohammed", "Uncle", "+966 50 123 4569"),
    }
}

// =============================================================================
// show
// =============================================================================

/// Dump the store as JSON. With `parent_id` (a `PO-` identifier), show that
/// parent's dashboard instead.
pub async fn show(store: &dyn StorageBackend, parent_id: Option<&str>) -> anyhow::Result<Value> {
    if let Some(parent_id) = parent_id {
        let parent = store
            .get_parent_by_parent_id(parent_id)
            .await?
            .ok_or_else(|| anyhow!("no parent with id {parent_id}"))?;
        let dashboard = ParentDashboard::load(store, parent.id)
            .await?
            .ok_or_else(|| anyhow!("parent {parent_id} removed while loading"))?;
        return Ok(serde_json::to_value(dashboard)?);
    }

    Ok(json!({
        "schools": store.get_all_schools().await?,
        "parents": store.get_all_parents().await?,
        "students": store.get_all_students().await?,
        "notifications": store.get_all_notifications().await?,
    }))
}

// =============================================================================
// verify / resend
// =============================================================================

/// Confirm the account holding `token`.
pub async fn verify(store: &dyn StorageBackend, token: &str) -> anyhow::Result<Parent> {
    let parent = store
        .get_parent_by_verification_token(token)
        .await?
        .ok_or_else(|| anyhow!("invalid or expired verification token"))?;

    store
        .verify_parent(parent.id)
        .await?
        .ok_or_else(|| anyhow!("parent {} removed while verifying", parent.parent_id))
}

/// Issue a fresh verification token for an unverified account.
pub async fn resend(store: &dyn StorageBackend, email: &str) -> anyhow::Result<Parent> {
    let parent = store
        .get_parent_by_email(email)
        .await?
        .ok_or_else(|| anyhow!("no account registered for {email}"))?;

    if parent.is_verified {
        bail!("{email} is already verified");
    }

    store
        .reissue_verification_token(parent.id)
        .await?
        .ok_or_else(|| anyhow!("parent {} removed while reissuing", parent.parent_id))
}
