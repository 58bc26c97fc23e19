//! Dashboard notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification addressed to a parent, a school, or both.
///
/// `is_read` only moves from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Surrogate id
    pub id: i64,
    /// Addressed parent
    pub parent_id: Option<i64>,
    /// Originating school
    pub school_id: Option<i64>,
    /// Headline
    pub title: String,
    /// Body text
    pub description: String,
    /// Free-form tag: "event", "message", "payment", ...
    pub notification_type: String,
    /// Whether the parent opened it
    pub is_read: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for posting a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// Addressed parent
    pub parent_id: Option<i64>,
    /// Originating school
    pub school_id: Option<i64>,
    /// Headline
    pub title: String,
    /// Body text
    pub description: String,
    /// Free-form tag
    pub notification_type: String,
}

impl NewNotification {
    /// Build the stored record, unread.
    pub(crate) fn into_record(self, id: i64, now: DateTime<Utc>) -> Notification {
        Notification {
            id,
            parent_id: self.parent_id,
            school_id: self.school_id,
            title: self.title,
            description: self.description,
            notification_type: self.notification_type,
            is_read: false,
            created_at: now,
        }
    }
}
