//! Schedule memoization with single-flight computation.
//!
//! A schedule is computed at most once per loan id. Concurrent first readers
//! of the same id block on a shared per-key cell while one of them runs the
//! computation, then every waiter shares the same immutable result.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::types::{LoanId, ScheduleEntry};
use crate::LoanEngineResult;

/// A computed schedule, shared immutably by the cache and all readers.
pub type Schedule = Arc<[ScheduleEntry]>;

type Cell = Arc<OnceLock<LoanEngineResult<Schedule>>>;

/// Per-loan schedule memo.
///
/// Entries live until [`ScheduleCache::invalidate`] removes them; loan ids
/// are never reused, so an entry can only be replaced by an explicit
/// invalidate-then-recompute.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    cells: Mutex<HashMap<LoanId, Cell>>,
    computations: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the schedule for `loan_id`, running `compute` at most once per
    /// cached lifetime of the id.
    ///
    /// The map lock is held only long enough to publish the per-key cell;
    /// the computation itself runs outside it, so distinct loan ids never
    /// serialize each other.
    pub fn get_or_compute<F>(&self, loan_id: LoanId, compute: F) -> LoanEngineResult<Schedule>
    where
        F: FnOnce() -> LoanEngineResult<Vec<ScheduleEntry>>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap();
            Arc::clone(
                cells
                    .entry(loan_id)
                    .or_insert_with(|| Arc::new(OnceLock::new())),
            )
        };

        if let Some(result) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return result.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        // Exactly one caller runs the closure; the rest block on the cell
        // and clone the leader's outcome, errors included.
        cell.get_or_init(|| {
            self.computations.fetch_add(1, Ordering::Relaxed);
            compute().map(Arc::from)
        })
        .clone()
    }

    /// Drop the cached schedule for `loan_id`.
    pub fn invalidate(&self, loan_id: LoanId) {
        let mut cells = self.cells.lock().unwrap();
        cells.remove(&loan_id);
    }

    /// Number of schedules computed since construction.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Number of lookups answered from an already-initialized cell.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that had to compute or wait on a computation.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups answered without touching a computation.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.lock().unwrap().is_empty()
    }
}
