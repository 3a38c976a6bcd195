//! In-memory student records guarded by a single lock.
//!
//! [`StudentStore`] is the sole owner of the record collection. Every operation takes the lock
//! for exactly one read-modify-write step and releases it before returning, so callers never
//! hold it across serialization or network I/O.

pub mod id;

use id::{IdGenerator, TimeSeededIds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Contact email address.
    pub email: String,
}

/// Client-supplied student fields used for create and full-replace update.
///
/// Any `id` present in the request body is ignored; missing fields fall back to their zero
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Age in years.
    #[serde(default)]
    pub age: i64,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
}

impl StudentFields {
    fn into_student(self, id: i64) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
        }
    }
}

/// Errors returned by store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record exists under the requested identifier.
    #[error("Student {0} not found")]
    NotFound(i64),
}

/// Lock-guarded collection of students keyed by identifier.
pub struct StudentStore {
    records: Mutex<HashMap<i64, Student>>,
    ids: Box<dyn IdGenerator>,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentStore {
    /// Create an empty store that assigns time-seeded random identifiers.
    pub fn new() -> Self {
        Self::with_generator(TimeSeededIds)
    }

    /// Create an empty store backed by the supplied identifier generator.
    pub fn with_generator<G>(ids: G) -> Self
    where
        G: IdGenerator + 'static,
    {
        Self {
            records: Mutex::new(HashMap::new()),
            ids: Box::new(ids),
        }
    }

    // Every mutation is a single insert or remove, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<i64, Student>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record under a freshly generated identifier.
    ///
    /// The identifier is not checked against existing records; a collision replaces the
    /// previous record.
    pub fn create(&self, fields: StudentFields) -> Student {
        let mut records = self.lock();
        let student = fields.into_student(self.ids.next_id());
        if records.insert(student.id, student.clone()).is_some() {
            tracing::warn!(id = student.id, "Generated id collided; previous student replaced");
        }
        student
    }

    /// Snapshot every stored record in unspecified order.
    pub fn list(&self) -> Vec<Student> {
        self.lock().values().cloned().collect()
    }

    /// Fetch a single record.
    pub fn get(&self, id: i64) -> Result<Student, StoreError> {
        self.lock().get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Replace every field of an existing record, keeping `id` as the stored identifier.
    pub fn update(&self, id: i64, fields: StudentFields) -> Result<Student, StoreError> {
        let mut records = self.lock();
        let slot = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = fields.into_student(id);
        Ok(slot.clone())
    }

    /// Remove a record.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
