//! TigerStyle Constants
//!
//! All limits use big-endian naming: CATEGORY_SPECIFICS_UNIT_LIMIT
//! Example: STORAGE_RETRY_DELAY_MS_BASE (not BASE_RETRY_DELAY)
//!
//! Every constant includes units in the name:
//! - _COUNT_MAX for quantity limits
//! - _SECS_DEFAULT for time durations
//! - _MS for milliseconds
//! - _DIGITS for zero-padded widths

// =============================================================================
// Business Identifiers
// =============================================================================

/// Prefix of school identifiers (`SC-YYNNNN`)
pub const SCHOOL_ID_PREFIX: &str = "SC";

/// Prefix of parent identifiers (`PO-YYYY-Mon-NNNNN`)
pub const PARENT_ID_PREFIX: &str = "PO";

/// Prefix of student identifiers (`STU-YYNNNN`)
pub const STUDENT_ID_PREFIX: &str = "STU";

/// Zero-padded width of the school/student sequence
pub const SEQUENCE_SHORT_DIGITS: usize = 4;

/// Zero-padded width of the parent sequence
pub const PARENT_SEQUENCE_DIGITS: usize = 5;

/// Segment count of a current-format parent identifier
pub const PARENT_ID_SEGMENTS_COUNT: usize = 4;

// =============================================================================
// Record Defaults
// =============================================================================

/// Country used when an address does not name one
pub const COUNTRY_DEFAULT: &str = "Saudi Arabia";

/// Status of a newly enrolled student
pub const STUDENT_STATUS_DEFAULT: &str = "Active";

// =============================================================================
// Storage Retry
// =============================================================================

/// Maximum number of attempts for one storage operation
pub const STORAGE_RETRY_ATTEMPTS_COUNT_MAX: u32 = 3;

/// Delay before the second attempt
pub const STORAGE_RETRY_DELAY_MS_BASE: u64 = 1000;

/// Backoff multiplier applied per attempt
pub const STORAGE_RETRY_BACKOFF_MULTIPLIER: u32 = 2;

/// Upper bound of random jitter, as a fraction of the attempt delay
pub const STORAGE_RETRY_JITTER_FRACTION_MAX: f64 = 0.3;

// =============================================================================
// Connection Pool
// =============================================================================

/// Maximum pooled connections (remote databases cap connections tightly)
pub const POOL_CONNECTIONS_COUNT_MAX: u32 = 5;

/// Idle connections are closed after this long
pub const POOL_IDLE_TIMEOUT_SECS_DEFAULT: u64 = 20;

/// Time allowed to acquire or open a connection
pub const POOL_CONNECT_TIMEOUT_SECS_DEFAULT: u64 = 10;

/// Connections are recycled after this long
pub const POOL_MAX_LIFETIME_SECS_DEFAULT: u64 = 30 * 60; // 30 minutes

/// Smallest pool size accepted from the environment
pub const POOL_CONNECTIONS_COUNT_MIN: u32 = 1;

/// Smallest pool timeout accepted from the environment
pub const POOL_TIMEOUT_SECS_MIN: u64 = 1;

/// Application name reported to Postgres
pub const POOL_APPLICATION_NAME: &str = "school-management-system";

// =============================================================================
// Environment
// =============================================================================

/// Connection string for the relational backend
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Pool size override
pub const ENV_POOL_MAX_CONNECTIONS: &str = "PG_POOL_MAX_CONNECTIONS";

/// Idle timeout override
pub const ENV_POOL_IDLE_TIMEOUT_SECS: &str = "PG_POOL_IDLE_TIMEOUT_SECS";

/// Connection lifetime override
pub const ENV_POOL_MAX_LIFETIME_SECS: &str = "PG_POOL_MAX_LIFETIME_SECS";

/// Connect timeout override
pub const ENV_POOL_CONNECT_TIMEOUT_SECS: &str = "PG_POOL_CONNECT_TIMEOUT_SECS";
