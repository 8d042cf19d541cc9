//! Failure taxonomy for calls made through a breaker.
//!
//! Every invocation resolves to exactly one of: the success value, a
//! synthetic [`BreakerError::CircuitOpen`] raised without invoking the
//! operation, or [`BreakerError::OperationFailed`] passing the underlying
//! failure through. The breaker never swallows an outcome and never retries.

use thiserror::Error;

/// Result type for calls made through a breaker.
pub type BreakerResult<T, E> = Result<T, BreakerError<E>>;

/// Errors produced by a call made through a breaker.
///
/// Generic over the underlying operation error type `E`, preserving the
/// original error instead of flattening it to a string.
#[derive(Debug, Error)]
pub enum BreakerError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Circuit is open; the call was rejected without invoking the
    /// underlying operation. The error text is the breaker's configured
    /// description.
    #[error("{description}")]
    CircuitOpen {
        /// Description identifying the breaker instance.
        description: String,
    },

    /// The underlying operation failed. Display and source are forwarded
    /// straight through to the original error.
    #[error(transparent)]
    OperationFailed(#[from] E),
}

impl<E> BreakerError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Whether this is the synthetic circuit-open rejection.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, BreakerError::CircuitOpen { .. })
    }

    /// The breaker description, if this is a circuit-open rejection.
    pub fn description(&self) -> Option<&str> {
        match self {
            BreakerError::CircuitOpen { description } => Some(description),
            BreakerError::OperationFailed(_) => None,
        }
    }
}
