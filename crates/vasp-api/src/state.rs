//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Registry**: the sector schemas, fixed for the life of the process.
//! - **Directory**: company records behind a `parking_lot::RwLock`.
//! - **Form sessions**: server-side sector form state, one per open
//!   admin editing page.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use vasp_core::{CompanySlug, SectorId};
use vasp_directory::csv_io::{import_companies, CsvError, ImportOptions};
use vasp_directory::Directory;
use vasp_sector::{PerSectorData, SchemaError, SectionController, SectionsView, SectorRegistry};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot`, not `tokio::sync`: it is never held across an
/// `.await`, and a panicking writer does not poison it.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Read-validate-update a record under a single write lock.
    ///
    /// Returns `None` if the record doesn't exist, or `Some(result)` with
    /// the closure's `Result`.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Keep only the records matching `keep`. Returns how many were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, value| keep(value));
        before - guard.len()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Form Sessions ------------------------------------------------------------

/// Sessions older than this are dropped the next time a session is opened.
pub const SESSION_TTL_HOURS: i64 = 8;

/// Server-side state of one sector form: the sectors being edited, their
/// expansion state, and the draft values not yet saved to the company.
#[derive(Debug, Clone, Serialize)]
pub struct FormSession {
    pub id: Uuid,
    pub company: CompanySlug,
    pub selected: Vec<SectorId>,
    pub controller: SectionController,
    pub draft: PerSectorData,
    pub created_at: DateTime<Utc>,
}

impl FormSession {
    /// Open a session over a company's sectors and stored details. Every
    /// selected sector starts expanded.
    pub fn open(company: CompanySlug, selected: Vec<SectorId>, draft: PerSectorData) -> Self {
        Self {
            id: Uuid::new_v4(),
            controller: SectionController::new(&selected),
            company,
            selected,
            draft,
            created_at: Utc::now(),
        }
    }

    pub fn render(&mut self, registry: &SectorRegistry) -> SectionsView {
        self.controller.render(registry, &self.selected, &self.draft)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::hours(SESSION_TTL_HOURS)
    }
}

// -- Configuration ------------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// YAML registry replacing the built-in sector schemas.
    pub registry_path: Option<PathBuf>,
    /// Company CSV loaded into the directory at startup.
    pub seed_csv_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read `PORT`, `VASP_SECTOR_REGISTRY` and `VASP_SEED_CSV`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let path_var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            port,
            registry_path: path_var("VASP_SECTOR_REGISTRY"),
            seed_csv_path: path_var("VASP_SEED_CSV"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            registry_path: None,
            seed_csv_path: None,
        }
    }
}

/// Failure to build the application state from configuration.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("sector registry: {0}")]
    Registry(#[from] SchemaError),

    #[error("cannot open seed CSV {path}: {source}")]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("seed CSV {path}: {source}")]
    SeedCsv { path: PathBuf, source: CsvError },
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SectorRegistry>,
    pub directory: Arc<RwLock<Directory>>,
    pub form_sessions: Store<FormSession>,
    pub config: AppConfig,
}

impl AppState {
    /// Empty directory over the built-in sector schemas.
    pub fn new() -> Self {
        Self::with_registry(SectorRegistry::builtin().clone(), AppConfig::default())
    }

    pub fn with_registry(registry: SectorRegistry, config: AppConfig) -> Self {
        let registry = Arc::new(registry);
        Self {
            directory: Arc::new(RwLock::new(Directory::new(Arc::clone(&registry)))),
            registry,
            form_sessions: Store::new(),
            config,
        }
    }

    /// Load the configured registry and seed the directory.
    ///
    /// Seed rows that fail validation or collide with an existing slug are
    /// logged and skipped; an unreadable seed file fails startup.
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let registry = match &config.registry_path {
            Some(path) => SectorRegistry::from_path(path)?,
            None => SectorRegistry::builtin().clone(),
        };

        let seed = config.seed_csv_path.clone();
        let state = Self::with_registry(registry, config);
        if let Some(path) = seed {
            state.seed_from_csv(&path)?;
        }
        Ok(state)
    }

    /// Drop form sessions past [`SESSION_TTL_HOURS`].
    pub fn sweep_expired_sessions(&self) -> usize {
        let now = Utc::now();
        let dropped = self.form_sessions.retain(|session| !session.is_expired(now));
        if dropped > 0 {
            tracing::debug!(dropped, "expired form sessions dropped");
        }
        dropped
    }

    fn seed_from_csv(&self, path: &Path) -> Result<(), StartupError> {
        let file = File::open(path).map_err(|source| StartupError::SeedFile {
            path: path.to_path_buf(),
            source,
        })?;
        let options = ImportOptions {
            max_rows: usize::MAX,
            ..ImportOptions::default()
        };
        let report = import_companies(file, &self.registry, &options).map_err(|source| {
            StartupError::SeedCsv {
                path: path.to_path_buf(),
                source,
            }
        })?;

        for error in &report.errors {
            tracing::warn!(row = error.row, message = %error.message, "seed row rejected");
        }
        let mut directory = self.directory.write();
        let mut created = 0usize;
        for company in report.imported {
            match directory.create(company) {
                Ok(_) => created += 1,
                Err(err) => tracing::warn!(error = %err, "seed company skipped"),
            }
        }
        tracing::info!(path = %path.display(), created, "seeded directory");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
