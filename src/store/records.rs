//! Generic keyed record store queried by filter. Records keep insertion order.

use crate::models::{Player, Registration, Tournament};
use crate::store::StoreError;
use std::sync::RwLock;
use uuid::Uuid;

/// Anything stored in a [`RecordStore`]: cloneable and identified by a UUID.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> Uuid;
}

impl Record for Player {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Tournament {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Registration {
    fn id(&self) -> Uuid {
        self.id
    }
}

pub struct RecordStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, record: T) -> Result<T, StoreError> {
        self.insert_checked(record, |_, _| Ok::<(), StoreError>(()))
    }

    /// Insert after `check` accepts the record against the current contents, under one lock.
    pub fn insert_checked<E>(
        &self,
        record: T,
        check: impl FnOnce(&T, &[T]) -> Result<(), E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut g = self.records.write().map_err(|_| StoreError::Poisoned)?;
        check(&record, &g)?;
        g.push(record.clone());
        Ok(record)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let g = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.iter().find(|r| r.id() == id).cloned())
    }

    pub fn all(&self) -> Result<Vec<T>, StoreError> {
        let g = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.clone())
    }

    pub fn find(&self, filter: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        let g = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.iter().filter(|r| filter(r)).cloned().collect())
    }

    pub fn find_one(&self, filter: impl Fn(&T) -> bool) -> Result<Option<T>, StoreError> {
        let g = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.iter().find(|r| filter(r)).cloned())
    }

    /// Edit a copy of record `id`; the copy replaces the stored record only if `f` succeeds.
    ///
    /// `f` also sees every stored record (including the unmodified original), so it can
    /// enforce uniqueness. Returns `Ok(None)` if no record has this id.
    pub fn modify<R, E>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut T, &[T]) -> Result<R, E>,
    ) -> Result<Option<(T, R)>, E>
    where
        E: From<StoreError>,
    {
        let mut g = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let Some(idx) = g.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let mut draft = g[idx].clone();
        let out = f(&mut draft, &g)?;
        g[idx] = draft.clone();
        Ok(Some((draft, out)))
    }

    pub fn remove(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let mut g = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let idx = g.iter().position(|r| r.id() == id);
        Ok(idx.map(|idx| g.remove(idx)))
    }

    /// Remove every record matching `filter`; returns how many were removed.
    pub fn remove_where(&self, filter: impl Fn(&T) -> bool) -> Result<usize, StoreError> {
        let mut g = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let before = g.len();
        g.retain(|r| !filter(r));
        Ok(before - g.len())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
