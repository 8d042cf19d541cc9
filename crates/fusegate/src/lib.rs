//! Circuit-breaker guard for asynchronous operations.
//!
//! A [`Breaker`] interposes a failure-counting guard between a caller and an
//! arbitrary operation (typically a network call). After a configurable
//! number of consecutive failures the circuit opens: further calls fail fast
//! with a synthetic [`BreakerError::CircuitOpen`] for a cooldown period,
//! without invoking the operation. Once the cooldown has elapsed, exactly one
//! probing call is allowed through to test recovery; its success closes the
//! circuit, its failure extends the open window.
//!
//! Breaker state is local to the instance: there is no cross-process
//! coordination, no retry of the underlying operation, and no background
//! timer: cooldown expiry is evaluated lazily when a call arrives.
//!
//! ```
//! use fusegate::{Breaker, BreakerOptions};
//! use std::time::Duration;
//!
//! let breaker = Breaker::new(
//!     BreakerOptions::builder()
//!         .max_failures(3)
//!         .cooldown(Duration::from_secs(60))
//!         .description("payments upstream")
//!         .build(),
//! );
//!
//! let value = breaker.call_sync(|| Ok::<_, std::io::Error>(42));
//! assert_eq!(value.ok(), Some(42));
//! ```
//!
//! Asynchronous operations go through [`Breaker::call`]:
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use fusegate::Breaker;
//!
//! let breaker = Breaker::with_defaults();
//! let result = breaker.call(|| async { Ok::<_, std::io::Error>("ok") }).await;
//! assert!(result.is_ok());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod breaker;
pub mod clock;
pub mod error;
pub mod options;
pub mod status;

// Re-export the public surface at the crate root for convenience
// ------------------------
pub use breaker::Breaker;
pub use clock::{Clock, MockClock, SystemClock};
pub use error::{BreakerError, BreakerResult};
pub use options::{BreakerBuilderWithClock, BreakerOptions, BreakerOptionsBuilder};
pub use status::{BreakerStatus, StatusCell};
