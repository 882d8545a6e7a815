//! Memoizing shared handles over single-owner futures.
//!
//! [`SharedFuture`] wraps any [`UniqueFuture`] and lets many holders wait
//! for and read its result, while the wrapped future is consumed exactly once.

mod error;
mod future;
mod join;
mod promise;
mod shared;
mod spawn;
mod unique;

pub use error::{Error, InvalidHandle, TaskError};
pub use future::SharedFuture;
pub use join::JoinHandle;
pub use promise::{promise, Promise};
pub use spawn::spawn;
pub use unique::UniqueFuture;
