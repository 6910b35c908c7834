#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use inventory_dashboard_client::{
    error::{AppError, AppResult},
    record::Record,
    store::RemoteStore,
};

/// 2025-06-01 09:00 UTC, the fixed "now" of these tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid timestamp")
}

pub fn today() -> NaiveDate {
    fixed_now().date_naive()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

fn unavailable() -> AppError {
    AppError::Remote {
        status: 503,
        message: "store unavailable".into(),
    }
}

/// In-memory remote store whose calls can be scripted to fail or stall.
pub struct ScriptedStore<R> {
    records: Mutex<Vec<R>>,
    next_id: AtomicU64,
    pub fail_fetch: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_remove: AtomicBool,
    /// When set, created records come back without an id.
    pub drop_created_id: AtomicBool,
    fetch_delays: Mutex<VecDeque<Duration>>,
    create_delay: Mutex<Option<Duration>>,
    pub fetch_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
}

impl<R: Record> ScriptedStore<R> {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Seeds the store; records without an id get one.
    pub fn seeded(records: Vec<R>) -> Self {
        let store = Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            fail_fetch: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            drop_created_id: AtomicBool::new(false),
            fetch_delays: Mutex::new(VecDeque::new()),
            create_delay: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        };
        store.replace(records);
        store
    }

    pub fn replace(&self, records: Vec<R>) {
        let records = records
            .into_iter()
            .map(|record| match record.id() {
                Some(_) => record,
                None => record.with_id(self.assign_id()),
            })
            .collect();
        *self.records.lock().unwrap() = records;
    }

    pub fn records(&self) -> Vec<R> {
        self.records.lock().unwrap().clone()
    }

    pub fn set_fail(&self, flag: &AtomicBool, fail: bool) {
        flag.store(fail, Ordering::SeqCst);
    }

    /// The next `fetch_all` sleeps this long after taking its snapshot.
    pub fn delay_next_fetch(&self, delay: Duration) {
        self.fetch_delays.lock().unwrap().push_back(delay);
    }

    pub fn delay_creates(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    fn assign_id(&self) -> String {
        format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl<R: Record> RemoteStore<R> for ScriptedStore<R> {
    async fn fetch_all(&self) -> AppResult<Vec<R>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.records();
        let delay = self.fetch_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(snapshot)
    }

    async fn create(&self, draft: &R) -> AppResult<R> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let canonical = draft.clone().with_id(self.assign_id());
        self.records.lock().unwrap().push(canonical.clone());
        if self.drop_created_id.load(Ordering::SeqCst) {
            let mut value = serde_json::to_value(&canonical).unwrap();
            value.as_object_mut().unwrap().remove("id");
            return Ok(serde_json::from_value(value).unwrap());
        }
        Ok(canonical)
    }

    async fn update(&self, id: &str, record: &R) -> AppResult<R> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|existing| existing.id() == Some(id))
            .ok_or(AppError::NotFound)?;
        *slot = record.clone();
        Ok(slot.clone())
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|existing| existing.id() != Some(id));
        if records.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
