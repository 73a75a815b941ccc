//! In-memory [`Backend`] used to exercise the state container in tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::model::{CoffeeRecord, NewCoffeeRecord, NewUser, User};
use crate::store::{Backend, StoreError};

#[derive(Default)]
pub struct Memory {
    users: Mutex<Vec<User>>,
    records: Mutex<Vec<CoffeeRecord>>,
    next_id: AtomicUsize,
    /// Every verb fails while set.
    pub fail_requests: AtomicBool,
    /// Accept user inserts but return no row, like a store whose policy
    /// hides the returning clause.
    pub swallow_inserted_row: AtomicBool,
}

impl Memory {
    pub fn seed_users(&self, users: Vec<User>) {
        *self.users.lock().unwrap() = users;
    }

    pub fn seed_records(&self, records: Vec<CoffeeRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn record(&self, record_id: &str) -> Option<CoffeeRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == record_id)
            .cloned()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_requests.load(Ordering::Relaxed) {
            return Err(StoreError::Rejected {
                status: 503,
                detail: "injected failure".to_owned(),
            });
        }
        Ok(())
    }

    fn assign_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl Backend for Memory {
    async fn select_users(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, StoreError> {
        self.check()?;
        let row = User {
            id: self.assign_id("u"),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            department: user.department.clone(),
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(row.clone());

        if self.swallow_inserted_row.load(Ordering::Relaxed) {
            return Ok(None);
        }
        Ok(Some(row))
    }

    async fn select_records(&self) -> Result<Vec<CoffeeRecord>, StoreError> {
        self.check()?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn insert_record(&self, record: &NewCoffeeRecord) -> Result<(), StoreError> {
        self.check()?;
        let row = CoffeeRecord {
            id: self.assign_id("r"),
            user_id: record.user_id.clone(),
            date: record.date,
            paid: record.paid,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(row);
        Ok(())
    }

    async fn mark_paid(&self, record_id: &str) -> Result<(), StoreError> {
        self.check()?;
        for record in self.records.lock().unwrap().iter_mut() {
            if record.id == record_id {
                record.paid = true;
            }
        }
        Ok(())
    }
}
