//! Immutable breaker configuration and builders.
//!
//! Options are validated by type alone: `u32` and `Duration` cannot be
//! negative, so building never fails.

use std::time::Duration;

use crate::breaker::Breaker;
use crate::clock::Clock;

/// Configuration for breaker behavior, supplied once per instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerOptions {
    /// Consecutive-failure threshold. Once the failure count has reached this
    /// value, the next failing call opens the circuit.
    pub max_failures: u32,
    /// How long the circuit stays open before a probe call is allowed.
    pub cooldown: Duration,
    /// Description attached to the fast-fail error to identify the breaker
    /// instance.
    pub description: String,
}

impl Default for BreakerOptions {
    fn default() -> Self {
        Self {
            max_failures: 3,
            cooldown: Duration::from_secs(60),
            description: "circuit breaker".to_string(),
        }
    }
}

impl BreakerOptions {
    /// Create an options builder.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> BreakerOptionsBuilder {
        BreakerOptionsBuilder::new()
    }

    /// Create an options builder (alias for `new()`).
    pub fn builder() -> BreakerOptionsBuilder {
        BreakerOptionsBuilder::new()
    }
}

/// Builder for [`BreakerOptions`].
#[derive(Debug)]
pub struct BreakerOptionsBuilder {
    options: BreakerOptions,
}

impl Default for BreakerOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakerOptionsBuilder {
    /// Start from the default options.
    pub fn new() -> Self {
        Self { options: BreakerOptions::default() }
    }

    /// Set the consecutive-failure threshold.
    pub fn max_failures(mut self, max_failures: u32) -> Self {
        self.options.max_failures = max_failures;
        self
    }

    /// Set the cooldown duration.
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.options.cooldown = cooldown;
        self
    }

    /// Set the breaker description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options.description = description.into();
        self
    }

    /// Set a custom clock; the resulting builder assembles a [`Breaker`]
    /// directly (useful for testing).
    pub fn clock<C: Clock>(self, clock: C) -> BreakerBuilderWithClock<C> {
        BreakerBuilderWithClock { options: self.options, clock }
    }

    /// Finish building the options.
    pub fn build(self) -> BreakerOptions {
        self.options
    }
}

/// Builder with a custom clock that builds a [`Breaker`] directly.
pub struct BreakerBuilderWithClock<C: Clock> {
    options: BreakerOptions,
    clock: C,
}

impl<C: Clock> BreakerBuilderWithClock<C> {
    /// Set the consecutive-failure threshold.
    pub fn max_failures(mut self, max_failures: u32) -> Self {
        self.options.max_failures = max_failures;
        self
    }

    /// Set the cooldown duration.
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.options.cooldown = cooldown;
        self
    }

    /// Set the breaker description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options.description = description.into();
        self
    }

    /// Build the breaker with the configured options and clock.
    pub fn build(self) -> Breaker<C> {
        Breaker::with_clock(self.options, self.clock)
    }
}
