//! Storage - Backend Trait and Implementations
//!
//! TigerStyle: One contract, chosen once at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StorageBackend Trait                      │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │  MemoryBackend  │           │ PostgresBackend │
//! │   (fallback)    │           │  (production)   │
//! └─────────────────┘           └─────────────────┘
//!          ↑                              ↑
//!          └────────── select_backend ────┘
//! ```
//!
//! # Selection
//!
//! `select_backend` prefers Postgres when a URL is configured and falls
//! back to memory when none is set or the connection cannot be opened.

mod backend;
mod error;
mod memory;
mod retry;
mod select;

#[cfg(feature = "postgres")]
mod postgres;

pub use backend::{BackendKind, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
pub use retry::RetryPolicy;
pub use select::{select_backend, SelectedBackend};

#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;
