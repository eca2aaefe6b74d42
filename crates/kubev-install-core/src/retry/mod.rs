//! Bounded retry for release downloads
//!
//! A policy caps the number of attempts and doubles the wait between them,
//! a predicate decides which failures are worth another attempt, and every
//! retry decision is logged through `tracing`.

mod error;
mod executor;
mod observer;
mod policy;

pub use error::RetryError;
pub use executor::RetryExecutor;
pub use observer::TracingObserver;
pub use policy::{HttpStatusError, HttpStatusPredicate, RetryPolicy, RetryPredicate};
