//! Portal Core - Storage and Identifiers for the School Portal
//!
//! TigerStyle: one storage contract, two interchangeable backends.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Portal Core                   │
//! ├─────────────────────────────────────────────┤
//! │  ids          │ SC- / PO- / STU- identifiers │
//! │  model        │ School, Parent, Student, ... │
//! │  storage      │ StorageBackend trait         │
//! │    memory     │ BTreeMap tables (fallback)   │
//! │    postgres   │ sqlx pool + retry policy     │
//! │  dashboard    │ parent dashboard read model  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use portal_core::config::DatabaseConfig;
//! use portal_core::storage::select_backend;
//!
//! let selected = select_backend(&DatabaseConfig::from_env()).await;
//! let store = selected.backend;
//! let schools = store.get_all_schools().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod ids;
pub mod model;
pub mod password;
pub mod storage;

// Re-export common types
pub use clock::{Clock, SimClock, SystemClock};
pub use config::DatabaseConfig;
pub use dashboard::ParentDashboard;
pub use model::{
    Address, EmergencyContact, EntityKind, Guardian, NewNotification, NewParent, NewSchool,
    NewStudent, Notification, Parent, ParentUpdate, School, SchoolAdmin, SchoolUpdate, Student,
};
pub use storage::{
    select_backend, BackendKind, MemoryBackend, RetryPolicy, SelectedBackend, StorageBackend,
    StorageError, StorageResult,
};

#[cfg(feature = "postgres")]
pub use storage::PostgresBackend;
