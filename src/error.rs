use thiserror::Error;

/// An operation other than `valid()` was invoked on a shared future
/// that refers to no state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("shared future has no state")]
pub struct InvalidHandle;

/// Failure of [`SharedFuture::get`](crate::SharedFuture::get).
///
/// `E` is the underlying future's error type; `get` hands it out
/// borrowed from the cache, so every holder sees the same failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    #[error(transparent)]
    InvalidHandle(#[from] InvalidHandle),
    /// The one retrieval of the underlying future unwound before producing
    /// a value. The underlying future is gone, so this is permanent.
    #[error("underlying future was abandoned during retrieval")]
    Abandoned,
    #[error("underlying future failed: {0}")]
    Underlying(E),
}

/// Failure of a [`JoinHandle`](crate::JoinHandle).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("handle does not refer to a task")]
    Invalid,
    #[error("promise dropped without a value")]
    Broken,
    #[error("task panicked: {0}")]
    Panicked(String),
}
