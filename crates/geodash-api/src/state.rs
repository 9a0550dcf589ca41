//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Catalog**: immutable taxonomy, geo resolver and fact store behind an
//!   `Arc`, read by every session without locking.
//! - **Sessions**: one [`SelectionMachine`] per session, each behind its own
//!   `parking_lot::Mutex` so events for one session serialize while other
//!   sessions proceed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use geodash_core::Catalog;
use geodash_state::SelectionMachine;
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::AppConfig;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await`.
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
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Insert only while fewer than `cap` records are stored. The check and
    /// the insert happen under one write lock.
    pub fn insert_bounded(&self, id: Uuid, value: T, cap: usize) -> bool {
        let mut data = self.data.write();
        if data.len() >= cap && !data.contains_key(&id) {
            return false;
        }
        data.insert(id, value);
        true
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Sessions -----------------------------------------------------------------

/// One client's independent selection cascade.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub machine: SelectionMachine,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            machine: SelectionMachine::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a session. The mutex is the session's single-writer lock.
pub type SessionHandle = Arc<Mutex<Session>>;

// -- AppState -----------------------------------------------------------------

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: Store<SessionHandle>,
    pub config: AppConfig,
    /// Present when `main` installed the Prometheus recorder.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Built-in catalog with default configuration.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin(), AppConfig::default())
    }

    pub fn with_catalog(catalog: Catalog, config: AppConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Store::new(),
            config,
            metrics: None,
        }
    }

    /// Attach the Prometheus render handle served at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Register a fresh session and return its handle, or `None` when
    /// `config.max_sessions` sessions are already live.
    pub fn open_session(&self) -> Option<SessionHandle> {
        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions
            .insert_bounded(id, Arc::clone(&handle), self.config.max_sessions)
            .then_some(handle)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
