use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    record::{Record, Submission},
    status::StatusPolicy,
    store::RemoteStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Empty,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied; carries the new collection size.
    Applied(usize),
    /// A newer load was issued while this one was in flight; its response
    /// was dropped.
    Stale,
}

struct Inner<R> {
    state: SyncState,
    items: Vec<R>,
    last_error: Option<String>,
    /// Sequence number of the most recently issued load.
    issued: u64,
    in_flight: HashSet<String>,
    /// Mutations confirmed while a load was in flight, replayed onto its
    /// snapshot so a slow load cannot undo them.
    journal: Vec<Confirmed<R>>,
}

enum Confirmed<R> {
    Created(R),
    Updated(R),
    Removed(String),
}

impl<R: Record> Confirmed<R> {
    fn replay(self, items: &mut Vec<R>) {
        match self {
            Confirmed::Created(record) => {
                match items.iter().position(|item| item.id() == record.id()) {
                    Some(index) => items[index] = record,
                    None => items.push(record),
                }
            }
            Confirmed::Updated(record) => {
                if let Some(slot) = items.iter_mut().find(|item| item.id() == record.id()) {
                    *slot = record;
                }
            }
            Confirmed::Removed(id) => items.retain(|item| item.id() != Some(id.as_str())),
        }
    }
}

impl<R> Inner<R> {
    fn confirm(&mut self, change: Confirmed<R>) {
        if self.state == SyncState::Loading {
            self.journal.push(change);
        }
    }
}

/// Local mirror of one remote collection.
///
/// Mutations are applied only after the remote store confirms them, and the
/// local entry is always the canonical record the store returned. Methods
/// take `&self` so several calls can be in flight at once: stale loads are
/// discarded by sequence number, and an identical create, update or remove
/// issued while the first is pending fails with [`AppError::Busy`].
pub struct CollectionSync<R, S> {
    store: S,
    inner: Mutex<Inner<R>>,
    clock: fn() -> DateTime<Utc>,
    policy: StatusPolicy,
}

impl<R: Record, S: RemoteStore<R>> CollectionSync<R, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner {
                state: SyncState::Empty,
                items: Vec::new(),
                last_error: None,
                issued: 0,
                in_flight: HashSet::new(),
                journal: Vec::new(),
            }),
            clock: Utc::now,
            policy: StatusPolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    pub fn state(&self) -> SyncState {
        self.lock().state
    }

    /// Snapshot of the collection.
    pub fn items(&self) -> Vec<R> {
        self.lock().items.clone()
    }

    pub fn with_items<T>(&self, f: impl FnOnce(&[R]) -> T) -> T {
        f(&self.lock().items)
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.lock()
            .items
            .iter()
            .find(|record| record.id() == Some(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Message of the last failed load, cleared by the next successful one.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub async fn load(&self) -> AppResult<LoadOutcome> {
        let seq = {
            let mut inner = self.lock();
            inner.issued += 1;
            inner.state = SyncState::Loading;
            inner.journal.clear();
            inner.issued
        };
        tracing::debug!(resource = R::RESOURCE, seq, "loading collection");

        let result = self.store.fetch_all().await;

        let mut inner = self.lock();
        if seq < inner.issued {
            tracing::debug!(
                resource = R::RESOURCE,
                seq,
                latest = inner.issued,
                "discarding stale load response"
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(records) => {
                let mut items = dedup_by_id(records);
                let journal = std::mem::take(&mut inner.journal);
                if !journal.is_empty() {
                    tracing::debug!(
                        resource = R::RESOURCE,
                        replayed = journal.len(),
                        "replaying mutations confirmed during load"
                    );
                }
                for change in journal {
                    change.replay(&mut items);
                }
                inner.items = items;
                inner.state = SyncState::Ready;
                inner.last_error = None;
                let count = inner.items.len();
                tracing::info!(resource = R::RESOURCE, count, "collection loaded");
                Ok(LoadOutcome::Applied(count))
            }
            Err(err) => {
                inner.journal.clear();
                inner.items.clear();
                inner.state = SyncState::Error;
                inner.last_error = Some(err.user_message());
                tracing::warn!(resource = R::RESOURCE, error = %err, "collection load failed");
                Err(err)
            }
        }
    }

    /// Normalizes and submits a draft; appends the canonical record the
    /// store returns. Nothing is inserted if the store fails.
    pub async fn create(&self, draft: R) -> AppResult<R> {
        if draft.id().is_some() {
            return Err(AppError::validation("A new record cannot carry an id"));
        }
        // Keyed on the draft as given: normalization stamps fields like the
        // order date, which would make every resubmission look distinct.
        let fingerprint =
            serde_json::to_string(&draft).map_err(|err| AppError::Internal(err.into()))?;
        let draft = draft.normalize(&self.submission())?;
        let guard = self.claim(format!("create:{fingerprint}"))?;

        let canonical = self.store.create(&draft).await.inspect_err(|err| {
            tracing::warn!(resource = R::RESOURCE, error = %err, "create failed");
        })?;
        drop(guard);

        let Some(id) = canonical.id().map(str::to_owned) else {
            tracing::warn!(
                resource = R::RESOURCE,
                "created record came back without an id, reloading"
            );
            // The record exists remotely; a reload is the only way to see it.
            if let Err(err) = self.load().await {
                tracing::warn!(resource = R::RESOURCE, error = %err, "reload after create failed");
            }
            return Err(AppError::InvalidResponse(format!(
                "created {} has no id",
                R::RESOURCE
            )));
        };

        let mut inner = self.lock();
        match inner
            .items
            .iter()
            .position(|record| record.id() == Some(id.as_str()))
        {
            Some(index) => inner.items[index] = canonical.clone(),
            None => inner.items.push(canonical.clone()),
        }
        inner.confirm(Confirmed::Created(canonical.clone()));
        tracing::info!(resource = R::RESOURCE, id = %id, "record created");
        Ok(canonical)
    }

    /// Applies `patch` to the local record, normalizes it and submits the
    /// full record. The local entry is replaced once the store confirms.
    pub async fn update(&self, id: &str, patch: R::Patch) -> AppResult<R> {
        let current = self.get(id).ok_or(AppError::NotFound)?;
        let record = current.apply(patch).normalize(&self.submission())?;
        let _guard = self.claim(format!("update:{id}"))?;

        let canonical = self.store.update(id, &record).await.inspect_err(|err| {
            tracing::warn!(resource = R::RESOURCE, id = %id, error = %err, "update failed");
        })?;
        let returned = canonical.id().map(str::to_owned);
        let canonical = match returned.as_deref() {
            None => canonical.with_id(id.to_owned()),
            Some(returned) if returned == id => canonical,
            Some(returned) => {
                return Err(AppError::InvalidResponse(format!(
                    "update of {id} returned record {returned}"
                )));
            }
        };

        let mut inner = self.lock();
        // A remove that completed meanwhile wins; the record is not revived.
        if let Some(slot) = inner
            .items
            .iter_mut()
            .find(|record| record.id() == Some(id))
        {
            *slot = canonical.clone();
        }
        inner.confirm(Confirmed::Updated(canonical.clone()));
        tracing::info!(resource = R::RESOURCE, id = %id, "record updated");
        Ok(canonical)
    }

    /// Removes the local entry only after the store confirms the delete.
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        let _guard = self.claim(format!("remove:{id}"))?;

        self.store.remove(id).await.inspect_err(|err| {
            tracing::warn!(resource = R::RESOURCE, id = %id, error = %err, "delete failed");
        })?;

        let mut inner = self.lock();
        inner.items.retain(|record| record.id() != Some(id));
        inner.confirm(Confirmed::Removed(id.to_owned()));
        tracing::info!(resource = R::RESOURCE, id = %id, "record deleted");
        Ok(())
    }

    fn submission(&self) -> Submission {
        Submission {
            now: (self.clock)(),
            policy: self.policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, key: String) -> AppResult<InFlight<'_, R>> {
        let mut inner = self.lock();
        if !inner.in_flight.insert(key.clone()) {
            tracing::debug!(resource = R::RESOURCE, "rejecting duplicate submission");
            return Err(AppError::Busy(format!(
                "a matching {} request is still pending",
                R::RESOURCE
            )));
        }
        Ok(InFlight {
            inner: &self.inner,
            key,
        })
    }
}

/// Marks one logical operation as pending until dropped, including when the
/// caller abandons the future.
struct InFlight<'a, R> {
    inner: &'a Mutex<Inner<R>>,
    key: String,
}

impl<R> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&self.key);
    }
}

/// Keeps the first record for each id; records without an id are kept.
fn dedup_by_id<R: Record>(records: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if let Some(id) = record.id() {
            if !seen.insert(id.to_owned()) {
                tracing::warn!(resource = R::RESOURCE, id = %id, "dropping duplicate id");
                continue;
            }
        }
        unique.push(record);
    }
    unique
}
