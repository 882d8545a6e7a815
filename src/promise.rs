use std::sync::Arc;

use tracing::debug;

use crate::{join::JoinHandle, shared::Slot, TaskError};

/// Write side of a manually completed [`JoinHandle`].
///
/// Dropping it without calling [`Promise::set`] completes the handle
/// with [`TaskError::Broken`].
pub struct Promise<T> {
    result: Option<Arc<Slot<Result<T, TaskError>>>>,
}

/// Creates a connected promise and handle pair.
pub fn promise<T>() -> (Promise<T>, JoinHandle<T>) {
    let result = Arc::new(Slot::new());
    let promise = Promise {
        result: Some(result.clone()),
    };
    (promise, JoinHandle::new(result))
}

impl<T> Promise<T> {
    pub fn set(mut self, value: T) {
        if let Some(result) = self.result.take() {
            result.put(Ok(value));
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(result) = self.result.take() {
            debug!("promise dropped without a value");
            result.put(Err(TaskError::Broken));
        }
    }
}
