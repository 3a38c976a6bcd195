//! Identifier generation for newly created students.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Exclusive upper bound for generated identifiers.
pub const ID_UPPER_BOUND: i64 = 10_000;

/// Source of identifiers for records inserted by [`crate::store::StudentStore::create`].
///
/// Implementations are not required to produce unique values; the store does not check for
/// collisions.
pub trait IdGenerator: Send + Sync {
    /// Produce the identifier for the next record.
    fn next_id(&self) -> i64;
}

/// Draws identifiers uniformly from `0..ID_UPPER_BOUND` using an RNG seeded from the wall clock.
///
/// A fresh generator is seeded on every call. Two calls landing on the same nanosecond yield the
/// same identifier. Not suitable for anything security sensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeSeededIds;

impl TimeSeededIds {
    fn seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default()
    }
}

impl IdGenerator for TimeSeededIds {
    fn next_id(&self) -> i64 {
        let mut rng = StdRng::seed_from_u64(Self::seed());
        rng.random_range(0..ID_UPPER_BOUND)
    }
}

/// Hands out increasing identifiers starting from a fixed value.
///
/// Useful wherever collisions must be ruled out, e.g. load tests against the store.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    /// Start the sequence at `start`.
    pub const fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
