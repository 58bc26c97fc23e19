//! Backend Selection
//!
//! TigerStyle: Decided once at startup, never re-evaluated.

use std::sync::Arc;

use super::backend::{BackendKind, StorageBackend};
use super::memory::MemoryBackend;
use crate::config::DatabaseConfig;

/// The backend serving this process.
#[derive(Clone)]
pub struct SelectedBackend {
    /// Shared handle used by every caller.
    pub backend: Arc<dyn StorageBackend>,
    /// Which implementation was chosen.
    pub kind: BackendKind,
}

impl std::fmt::Debug for SelectedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedBackend")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl SelectedBackend {
    fn memory() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            kind: BackendKind::Memory,
        }
    }
}

/// Choose the storage backend for this process.
///
/// Never fails: a missing URL or an unreachable database both yield the
/// in-memory backend, with the reason logged.
pub async fn select_backend(config: &DatabaseConfig) -> SelectedBackend {
    let selected = match config.url.as_deref() {
        None => {
            tracing::warn!("DATABASE_URL is not set, records will not survive a restart");
            SelectedBackend::memory()
        }
        Some(_) => connect(config).await,
    };

    tracing::info!(backend = %selected.kind, "storage backend selected");
    selected
}

#[cfg(feature = "postgres")]
async fn connect(config: &DatabaseConfig) -> SelectedBackend {
    match super::postgres::PostgresBackend::connect(config).await {
        Ok(backend) => SelectedBackend {
            backend: Arc::new(backend),
            kind: BackendKind::Postgres,
        },
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable, falling back to in-memory storage");
            SelectedBackend::memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn connect(_config: &DatabaseConfig) -> SelectedBackend {
    tracing::warn!("built without the postgres feature, using in-memory storage");
    SelectedBackend::memory()
}
