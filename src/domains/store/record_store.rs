//! Id-keyed record store.
//!
//! Records are kept in a `BTreeMap` keyed by their id. Ids are handed out by
//! a monotonically increasing counter, so ascending key order is also
//! insertion order.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::error::{StoreError, StoreResult};

/// A record that can be held by a [`RecordStore`].
pub trait Record: Clone + Send + Sync + 'static {
    /// The id assigned to this record by its store.
    fn id(&self) -> u64;
}

struct Inner<T> {
    records: BTreeMap<u64, T>,
    next_id: u64,
}

/// In-memory collection of records with store-assigned ids.
pub struct RecordStore<T: Record> {
    inner: RwLock<Inner<T>>,
}

impl<T: Record> RecordStore<T> {
    /// Create an empty store. The first id handed out is 1.
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Create a store pre-populated with `records`.
    ///
    /// The next id is one past the highest seeded id.
    pub fn seeded(records: Vec<T>) -> Self {
        let records: BTreeMap<u64, T> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = records.keys().next_back().map_or(1, |id| id + 1);

        Self {
            inner: RwLock::new(Inner { records, next_id }),
        }
    }

    /// Assign the next id and store the record built from it.
    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> StoreResult<T> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;

        let id = inner.next_id;
        let record = build(id);
        inner.records.insert(id, record.clone());
        inner.next_id += 1;

        Ok(record)
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> StoreResult<Option<T>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;
        Ok(inner.records.get(&id).cloned())
    }

    /// Snapshot every record matching `predicate`, in id order.
    pub fn list(&self, predicate: impl Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("list"))?;
        Ok(inner
            .records
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }

    /// Apply `patch` to the record with `id` under the write lock.
    ///
    /// Returns the updated record together with whatever `patch` returned,
    /// or `None` if no such record exists.
    pub fn update<R>(&self, id: u64, patch: impl FnOnce(&mut T) -> R) -> StoreResult<Option<(T, R)>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;

        Ok(inner.records.get_mut(&id).map(|record| {
            let outcome = patch(record);
            (record.clone(), outcome)
        }))
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&self, id: u64) -> StoreResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;
        Ok(inner.records.remove(&id).is_some())
    }

    /// Number of records currently held.
    pub fn len(&self) -> StoreResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(inner.records.len())
    }
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
