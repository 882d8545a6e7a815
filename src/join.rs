use std::sync::Arc;

use crate::{shared::Slot, TaskError, UniqueFuture};

/// Single-owner handle to a value produced on another thread,
/// either by [`spawn`](crate::spawn) or by a [`Promise`](crate::Promise).
///
/// A default-constructed handle refers to no task and is invalid.
pub struct JoinHandle<T> {
    /// Result item lifetime is bounded by the longest of the handle and its producer.
    pub(crate) result: Option<Arc<Slot<Result<T, TaskError>>>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(result: Arc<Slot<Result<T, TaskError>>>) -> Self {
        Self {
            result: Some(result),
        }
    }
}

impl<T> Default for JoinHandle<T> {
    fn default() -> Self {
        Self { result: None }
    }
}

impl<T> UniqueFuture for JoinHandle<T> {
    type Output = T;
    type Error = TaskError;

    fn is_valid(&self) -> bool {
        self.result.is_some()
    }

    fn is_ready(&self) -> bool {
        self.result.as_ref().map_or(false, |result| result.is_ready())
    }

    fn wait(&self) {
        if let Some(result) = &self.result {
            result.wait();
        }
    }

    fn get(self) -> Result<T, TaskError> {
        match self.result {
            Some(result) => result.take(),
            None => Err(TaskError::Invalid),
        }
    }
}
