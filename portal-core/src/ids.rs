//! Business Identifiers
//!
//! Human-readable identifiers shown to parents and administrators:
//!
//! ```text
//! SC-250001           school   <prefix>-<YY><count + 1>
//! STU-250001          student  <prefix>-<YY><count + 1>
//! PO-2025-Jan-00001   parent   <prefix>-<YYYY>-<Mon>-<sequence>
//! ```
//!
//! Parent sequences continue from the previously issued identifier and restart
//! at 1 every calendar month. Callers must pass the true last-issued id and
//! serialize generation with the insert; both backends do this under a lock.

use chrono::{DateTime, Datelike, Utc};

use crate::constants::{
    PARENT_ID_PREFIX, PARENT_ID_SEGMENTS_COUNT, PARENT_SEQUENCE_DIGITS, SCHOOL_ID_PREFIX,
    SEQUENCE_SHORT_DIGITS, STUDENT_ID_PREFIX,
};

/// Next parent identifier after `last`, for the month containing `now`.
///
/// Identifiers in an older format (`PO-YYYY-NNNNN`, `PO-YYNNNNN`) or from a
/// different month start a fresh sequence.
#[must_use]
pub fn next_parent_id(last: Option<&str>, now: DateTime<Utc>) -> String {
    let year = now.year().to_string();
    let month = month_abbrev(now);

    let sequence = last
        .and_then(|last| continued_sequence(last, &year, &month))
        .unwrap_or(1);

    format_parent_id(&year, &month, sequence)
}

/// School identifier for a store that already holds `existing_count` schools.
#[must_use]
pub fn school_id(existing_count: usize, now: DateTime<Utc>) -> String {
    short_id(SCHOOL_ID_PREFIX, existing_count, now)
}

/// Student identifier for a store that already holds `existing_count` students.
#[must_use]
pub fn student_id(existing_count: usize, now: DateTime<Utc>) -> String {
    short_id(STUDENT_ID_PREFIX, existing_count, now)
}

/// Three-letter English month abbreviation (`Jan` .. `Dec`).
#[must_use]
pub fn month_abbrev(now: DateTime<Utc>) -> String {
    now.format("%b").to_string()
}

/// Sequence following `last` when it was issued in `year`/`month`.
fn continued_sequence(last: &str, year: &str, month: &str) -> Option<u32> {
    let segments: Vec<&str> = last.split('-').collect();
    if segments.len() != PARENT_ID_SEGMENTS_COUNT {
        return None;
    }
    if segments[1] != year || segments[2] != month {
        return None;
    }

    let previous: u32 = segments[3].parse().ok()?;
    previous.checked_add(1)
}

fn format_parent_id(year: &str, month: &str, sequence: u32) -> String {
    // Precondition
    assert!(sequence > 0, "parent sequence starts at 1");

    format!(
        "{PARENT_ID_PREFIX}-{year}-{month}-{sequence:0width$}",
        width = PARENT_SEQUENCE_DIGITS
    )
}

fn short_id(prefix: &str, existing_count: usize, now: DateTime<Utc>) -> String {
    let yy = now.year().rem_euclid(100);
    let sequence = existing_count + 1;
    format!(
        "{prefix}-{yy:02}{sequence:0width$}",
        width = SEQUENCE_SHORT_DIGITS
    )
}
