//! Helpers that schedule work on the tokio runtime: trailing-edge debouncing
//! and bounded image-load retries.

pub mod debounce;
pub mod retry;

pub use debounce::Debouncer;
pub use retry::{ImageRetryLoader, ImageTarget, RetryOutcome, RetryPolicy};
