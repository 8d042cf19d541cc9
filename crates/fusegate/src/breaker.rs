//! Call interception and the breaker decision engine.
//!
//! The breaker sits between a caller and an arbitrary failing operation and
//! decides, per invocation, whether to run the operation normally, reject it
//! without running it, or run it as the single post-cooldown probe.
//!
//! State transitions (per instance):
//!
//! ```text
//! Closed(n) → Closed(n+1)        failure while n < max_failures
//! Closed(n) → Open(now+cooldown) failure while n >= max_failures
//! Closed(n) → Closed(n)          success (the count is NOT reset)
//! Open(t)   → Open(t)            fast-fail while now <= t
//! Open(t)   → Open(now+cooldown) cooldown expired: re-arm, then probe
//! probe success → Closed(0)
//! probe failure → stays Open with the re-armed window
//! ```
//!
//! Only a successful probe resets the failure count; a plain success while
//! closed leaves it untouched. Expiry is evaluated lazily when a call
//! arrives; there are no background timers.
//!
//! The expiry check and the re-arm write share one critical section on the
//! status cell, so concurrent callers racing an expired window elect exactly
//! one probe and every other caller observes the extended window. The lock
//! is never held across the operation itself.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{BreakerError, BreakerResult};
use crate::options::{BreakerOptions, BreakerOptionsBuilder};
use crate::status::{BreakerStatus, StatusCell};

/// What the decision engine chose to do with an arriving call.
enum Action {
    /// Status was `Closed`: run the operation normally.
    Invoke,
    /// Status was `Open` with the cooldown still running: reject the call.
    FastFail,
    /// Status was `Open` with the cooldown expired: the window has been
    /// re-armed and this call carries the single probe.
    Probe,
}

/// A circuit breaker guarding one protected resource.
///
/// After `max_failures` consecutive failures have accumulated, the next
/// failing call opens the circuit: further calls fail fast with a
/// [`BreakerError::CircuitOpen`] carrying the configured description, without
/// invoking the operation. Once the cooldown has elapsed, a single probe call
/// is let through; its success closes the circuit, its failure extends the
/// open window.
///
/// A breaker constructed with [`Breaker::new`] owns a private status cell and
/// is invoked repeatedly as a plain value. [`Breaker::with_cell`] accepts a
/// previously obtained [`StatusCell`] so multiple call-sites can share one
/// breaker's status.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use fusegate::Breaker;
///
/// let breaker = Breaker::with_defaults();
/// let result = breaker.call(|| async { Ok::<_, std::io::Error>(42) }).await;
/// assert_eq!(result.ok(), Some(42));
/// # }
/// ```
pub struct Breaker<C: Clock = SystemClock> {
    options: BreakerOptions,
    cell: StatusCell,
    clock: Arc<C>,
}

impl<C: Clock> fmt::Debug for Breaker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breaker")
            .field("options", &self.options)
            .field("status", &self.status())
            .finish()
    }
}

impl<C: Clock> Clone for Breaker<C> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            cell: self.cell.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl Breaker<SystemClock> {
    /// Create a breaker with a fresh private status cell.
    pub fn new(options: BreakerOptions) -> Self {
        Self::with_cell(options, StatusCell::new())
    }

    /// Create a breaker with default options (convenience method).
    pub fn with_defaults() -> Self {
        Self::new(BreakerOptions::default())
    }

    /// Create a breaker sharing a previously obtained status cell.
    pub fn with_cell(options: BreakerOptions, cell: StatusCell) -> Self {
        Self { options, cell, clock: Arc::new(SystemClock) }
    }

    /// Create a breaker using the builder pattern.
    pub fn builder() -> BreakerOptionsBuilder {
        BreakerOptionsBuilder::new()
    }
}

impl Default for Breaker<SystemClock> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<C: Clock> Breaker<C> {
    /// Create a breaker with a custom clock (useful for testing).
    pub fn with_clock(options: BreakerOptions, clock: C) -> Self {
        Self::with_cell_and_clock(options, StatusCell::new(), clock)
    }

    /// Create a breaker with both a shared status cell and a custom clock.
    pub fn with_cell_and_clock(options: BreakerOptions, cell: StatusCell, clock: C) -> Self {
        Self { options, cell, clock: Arc::new(clock) }
    }

    /// The options this breaker was built with.
    pub fn options(&self) -> &BreakerOptions {
        &self.options
    }

    /// A copy of the current status, for tests and observability.
    pub fn status(&self) -> BreakerStatus {
        self.cell.status()
    }

    /// The shared status cell handle, for handing to other call-sites.
    pub fn cell(&self) -> StatusCell {
        self.cell.clone()
    }

    /// Lightweight check whether the circuit is not open.
    ///
    /// An open circuit with an expired window still reports unavailable;
    /// expiry is only evaluated when a call arrives.
    pub fn is_available(&self) -> bool {
        !self.status().is_open()
    }

    /// Invoke an asynchronous operation through the breaker.
    ///
    /// The operation runs to whatever completion it provides; the breaker
    /// imposes no timeout and never retries. Exactly one outcome is returned:
    /// the success value, the operation's own error, or the synthetic
    /// circuit-open rejection.
    #[instrument(skip(self, operation), fields(breaker = %self.options.description, status = %self.status()))]
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let probing = match self.decide() {
            Action::Invoke => false,
            Action::Probe => {
                debug!(breaker = %self.options.description, "cooldown expired, probing");
                true
            }
            Action::FastFail => {
                debug!(breaker = %self.options.description, "circuit open, failing fast");
                return Err(self.circuit_open());
            }
        };

        match operation().await {
            Ok(value) => {
                if probing {
                    self.record_probe_success();
                }
                Ok(value)
            }
            Err(error) => {
                warn!(breaker = %self.options.description, %error, "operation failed");
                self.record_failure();
                Err(BreakerError::OperationFailed(error))
            }
        }
    }

    /// Invoke a synchronous operation through the breaker.
    ///
    /// Synchronous alternative to [`Breaker::call`] for non-async contexts;
    /// the decision and transition semantics are identical.
    #[instrument(skip(self, operation), fields(breaker = %self.options.description, status = %self.status()))]
    pub fn call_sync<F, T, E>(&self, operation: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let probing = match self.decide() {
            Action::Invoke => false,
            Action::Probe => {
                debug!(breaker = %self.options.description, "cooldown expired, probing");
                true
            }
            Action::FastFail => {
                debug!(breaker = %self.options.description, "circuit open, failing fast");
                return Err(self.circuit_open());
            }
        };

        match operation() {
            Ok(value) => {
                if probing {
                    self.record_probe_success();
                }
                Ok(value)
            }
            Err(error) => {
                warn!(breaker = %self.options.description, %error, "operation failed");
                self.record_failure();
                Err(BreakerError::OperationFailed(error))
            }
        }
    }

    /// Decide how to handle an arriving call.
    ///
    /// The expired-window case re-arms the window in the same critical
    /// section, before the probe runs: a concurrent caller arriving mid-probe
    /// observes the extended window, never the expired one.
    fn decide(&self) -> Action {
        let mut status = self.cell.lock();
        match *status {
            BreakerStatus::Closed { .. } => Action::Invoke,
            BreakerStatus::Open { resume_at } => {
                let now = self.clock.now();
                if now > resume_at {
                    *status = BreakerStatus::Open { resume_at: now + self.options.cooldown };
                    Action::Probe
                } else {
                    Action::FastFail
                }
            }
        }
    }

    /// Record a failed operation.
    ///
    /// Re-reads the status: the threshold check uses the pre-increment count,
    /// so from a fresh circuit it takes `max_failures + 1` consecutive
    /// failures to open. A failure observed while already `Open` (a failed
    /// probe) mutates nothing; the window was re-armed before the probe ran.
    fn record_failure(&self) {
        let mut status = self.cell.lock();
        match *status {
            BreakerStatus::Closed { error_count } => {
                if error_count >= self.options.max_failures {
                    let resume_at = self.clock.now() + self.options.cooldown;
                    *status = BreakerStatus::Open { resume_at };
                    warn!(
                        breaker = %self.options.description,
                        failures = error_count.saturating_add(1),
                        "failure threshold reached, circuit opened"
                    );
                } else {
                    *status = BreakerStatus::Closed { error_count: error_count.saturating_add(1) };
                }
            }
            BreakerStatus::Open { .. } => {}
        }
    }

    /// Record a successful probe: the circuit closes with a fresh count.
    fn record_probe_success(&self) {
        self.cell.set(BreakerStatus::Closed { error_count: 0 });
        info!(breaker = %self.options.description, "probe succeeded, circuit closed");
    }

    fn circuit_open<E>(&self) -> BreakerError<E>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BreakerError::CircuitOpen { description: self.options.description.clone() }
    }
}
