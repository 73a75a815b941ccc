//! Remote store boundary.
//!
//! The hosted backend is opaque to the rest of the crate: two resources
//! (`users` and `coffee_records`) supporting select-all, insert-one and a
//! `paid` update by id. Whether a usable backend exists is decided once at
//! startup and carried in [`Store`]; call sites never re-check credentials.

#[cfg(test)]
pub mod memory;
pub mod rest;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::model::{CoffeeRecord, NewCoffeeRecord, NewUser, User};

/// Errors crossing the store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("remote store is not configured: {0}")]
    Unavailable(String),

    #[error("request to remote store failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("remote store rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
}

/// Verbs the remote data store exposes, per resource.
///
/// A trait seam so the state container can be exercised against an
/// in-memory implementation in tests.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn select_users(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a user and ask the store for the created row. `None` means
    /// the insert was accepted but no row came back (e.g. policy
    /// restrictions on the returning clause).
    async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, StoreError>;

    async fn select_records(&self) -> Result<Vec<CoffeeRecord>, StoreError>;

    async fn insert_record(&self, record: &NewCoffeeRecord) -> Result<(), StoreError>;

    /// Set `paid = true` on one record. Already-paid rows are a no-op on
    /// the remote side.
    async fn mark_paid(&self, record_id: &str) -> Result<(), StoreError>;
}

/// The store as seen by the application: either a usable backend, or the
/// reason there is none.
#[derive(Clone)]
pub enum Store {
    Unavailable(String),
    Available(Arc<dyn Backend>),
}

impl Store {
    /// Build the store from startup configuration. Missing or malformed
    /// credentials degrade to [`Store::Unavailable`] rather than failing.
    pub fn from_config(config: Result<StoreConfig, crate::config::ConfigError>) -> Self {
        match config {
            Ok(cfg) => match rest::Rest::connect(&cfg.url, &cfg.key) {
                Ok(backend) => Self::Available(Arc::new(backend)),
                Err(err) => Self::Unavailable(err.to_string()),
            },
            Err(err) => Self::Unavailable(err.to_string()),
        }
    }

    pub fn backend(&self) -> Result<&Arc<dyn Backend>, StoreError> {
        match self {
            Self::Available(backend) => Ok(backend),
            Self::Unavailable(reason) => {
                Err(StoreError::Unavailable(reason.clone()))
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
