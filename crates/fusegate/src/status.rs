//! Breaker status and the shared status cell.
//!
//! A breaker is in exactly one status at any observation point:
//! - `Closed`: normal operation, calls pass through; carries the number of
//!   consecutive failures observed since the circuit last closed or opened.
//! - `Open`: circuit tripped, calls fail fast; carries the earliest time at
//!   which a probe may be attempted.
//!
//! Callers never construct or mutate a status directly; they observe it via
//! [`StatusCell::status`] and trigger transitions by invoking calls through
//! the breaker.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tracing::warn;

/// Current status of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerStatus {
    /// Circuit is closed, allowing requests.
    Closed {
        /// Consecutive failures observed since the circuit last closed or
        /// opened.
        error_count: u32,
    },
    /// Circuit is open, rejecting requests.
    Open {
        /// Earliest time at which a probe call may be attempted.
        resume_at: Instant,
    },
}

impl BreakerStatus {
    /// Whether the status is `Closed`.
    pub fn is_closed(&self) -> bool {
        matches!(self, BreakerStatus::Closed { .. })
    }

    /// Whether the status is `Open`.
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerStatus::Open { .. })
    }

    /// Consecutive failure count, if the circuit is closed.
    pub fn error_count(&self) -> Option<u32> {
        match self {
            BreakerStatus::Closed { error_count } => Some(*error_count),
            BreakerStatus::Open { .. } => None,
        }
    }

    /// Earliest probe time, if the circuit is open.
    pub fn resume_at(&self) -> Option<Instant> {
        match self {
            BreakerStatus::Closed { .. } => None,
            BreakerStatus::Open { resume_at } => Some(*resume_at),
        }
    }
}

impl Default for BreakerStatus {
    fn default() -> Self {
        BreakerStatus::Closed { error_count: 0 }
    }
}

impl fmt::Display for BreakerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerStatus::Closed { .. } => write!(f, "CLOSED"),
            BreakerStatus::Open { .. } => write!(f, "OPEN"),
        }
    }
}

/// Shared, mutable holder for a breaker's [`BreakerStatus`].
///
/// Clones share the same underlying cell, so a cell obtained from one breaker
/// can be handed to another call-site (or inspected between calls in tests).
/// A fresh cell starts at `Closed { error_count: 0 }`.
#[derive(Debug, Clone)]
pub struct StatusCell {
    inner: Arc<Mutex<BreakerStatus>>,
}

impl StatusCell {
    /// Create a new cell initialized to `Closed { error_count: 0 }`.
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(BreakerStatus::default())) }
    }

    /// Read the current status.
    pub fn status(&self) -> BreakerStatus {
        *self.lock()
    }

    /// Overwrite the current status.
    pub(crate) fn set(&self, status: BreakerStatus) {
        *self.lock() = status;
    }

    /// Lock the cell, recovering from a poisoned lock rather than panicking.
    pub(crate) fn lock(&self) -> MutexGuard<'_, BreakerStatus> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("breaker status lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}
