//! Shared state container.
//!
//! Single point of truth for the mirrored `users` and `coffee_records`
//! collections, the derived people list, and the navigation state. Every
//! remote read or write goes through an operation here; view handlers never
//! touch the collections directly.
//!
//! Remote failures land in the shared `error` slot instead of propagating:
//! views render the message, nothing unwinds.

use tokio::sync::RwLock;

use crate::model::{
    CoffeeRecord, NewCoffeeRecord, NewUser, Person, User, View, project,
};
use crate::store::{Store, StoreError};

/// Fetch-cycle state, decided once during [`AppContext::init`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    Errored,
    /// Store credentials are missing or unusable; rendered as a dedicated
    /// screen rather than an error banner.
    Unconfigured,
}

/// One coherent copy of everything the views read.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub users: Vec<User>,
    pub records: Vec<CoffeeRecord>,
    pub people: Vec<Person>,
    pub current_view: View,
    pub selected_user: Option<String>,
    pub phase: Phase,
    pub error: Option<String>,
}

/// The application context handed down to the view layer.
///
/// Constructed once by the entry point; the lock is never held across a
/// remote call, so concurrent operations race exactly as far as the remote
/// store's per-row atomicity allows.
pub struct AppContext {
    store: Store,
    state: RwLock<Snapshot>,
}

impl AppContext {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            state: RwLock::new(Snapshot::default()),
        }
    }

    /// Fetch both collections and derive the people list.
    ///
    /// Either request failing surfaces one user-visible message and leaves
    /// both collections empty; the process keeps running.
    pub async fn init(&self) {
        let backend = match self.store.backend() {
            Ok(backend) => backend,
            Err(err) => {
                let mut state = self.state.write().await;
                state.phase = Phase::Unconfigured;
                state.error = Some(err.to_string());
                return;
            },
        };

        let (users, records) =
            tokio::join!(backend.select_users(), backend.select_records());

        let mut state = self.state.write().await;
        match (users, records) {
            (Ok(users), Ok(records)) => {
                tracing::info!(
                    users = users.len(),
                    records = records.len(),
                    "collections mirrored from store"
                );
                state.users = users;
                state.records = records;
                state.people = project(&state.users, &state.records);
                state.phase = Phase::Ready;
                state.error = None;
            },
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(error = %err, "initial fetch failed");
                state.users.clear();
                state.records.clear();
                state.people.clear();
                state.phase = Phase::Errored;
                state.error = Some(err.to_string());
            },
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    /// Log one unpaid coffee for `user_id`, then resynchronize the record
    /// collection. The id is taken as-is; an id matching no user produces
    /// an orphan record the projection silently ignores.
    pub async fn add_coffee_record(&self, user_id: &str) {
        let backend = match self.store.backend() {
            Ok(backend) => backend,
            Err(err) => return self.fail("cannot log coffee", err).await,
        };

        let record = NewCoffeeRecord::owed_by(user_id);
        if let Err(err) = backend.insert_record(&record).await {
            return self.fail("cannot log coffee", err).await;
        }

        // Refetch-all rather than appending locally: an extra round trip,
        // but the mirror also picks up concurrent external writes.
        match backend.select_records().await {
            Ok(records) => {
                let mut state = self.state.write().await;
                state.records = records;
                state.people = project(&state.users, &state.records);
                state.error = None;
            },
            Err(err) => {
                self.fail("coffee logged, but resynchronization failed", err)
                    .await
            },
        }
    }

    /// Create a user and show their detail view.
    ///
    /// The store assigns id and creation timestamp, so the returned row is
    /// authoritative. A missing or malformed returned row leaves local
    /// state untouched; fabricating a person without a valid id would
    /// break every later operation keyed on it.
    pub async fn add_user(&self, user: NewUser) {
        let backend = match self.store.backend() {
            Ok(backend) => backend,
            Err(err) => return self.fail("cannot add user", err).await,
        };

        let row = match backend.insert_user(&user).await {
            Ok(row) => row,
            Err(err) => return self.fail("cannot add user", err).await,
        };

        let mut state = self.state.write().await;
        match row {
            Some(row) if row.is_well_formed() => {
                state.selected_user = Some(row.id.clone());
                state.current_view = View::Log;
                state.users.push(row);
                state.people = project(&state.users, &state.records);
                state.error = None;
            },
            Some(row) => {
                tracing::warn!(?row, "store returned a malformed user row");
                state.error = Some(
                    "the store returned an unusable user row; \
                     the user was not added locally"
                        .to_owned(),
                );
            },
            None => {
                tracing::warn!("user insert returned no row");
                state.error = Some(
                    "the store accepted the user but returned no row; \
                     reload to see whether it was created"
                        .to_owned(),
                );
            },
        }
    }

    /// Flip one record to paid and patch the local mirror.
    ///
    /// Paying an already-paid record is a no-op on both sides.
    pub async fn pay_coffee(&self, record_id: &str) {
        let backend = match self.store.backend() {
            Ok(backend) => backend,
            Err(err) => return self.fail("cannot pay coffee", err).await,
        };

        if let Err(err) = backend.mark_paid(record_id).await {
            return self.fail("cannot pay coffee", err).await;
        }

        let mut state = self.state.write().await;
        for record in state.records.iter_mut() {
            if record.id == record_id {
                record.paid = true;
            }
        }
        state.people = project(&state.users, &state.records);
        state.error = None;
    }

    /// Pure local assignment; no remote effect.
    pub async fn select_user(&self, user_id: Option<String>) {
        self.state.write().await.selected_user = user_id;
    }

    /// Pure local assignment; no remote effect.
    pub async fn set_view(&self, view: View) {
        self.state.write().await.current_view = view;
    }

    async fn fail(&self, what: &str, err: StoreError) {
        tracing::warn!(error = %err, what, "store operation failed");
        self.state.write().await.error = Some(format!("{what}: {err}"));
    }
}
