use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread,
};

use tracing::debug;

use crate::{join::JoinHandle, shared::Slot, TaskError};

/// Runs `f` on a new thread and returns the handle to its result.
///
/// A panic inside `f` is caught and delivered through the handle
/// as [`TaskError::Panicked`].
///
/// # Panics
///
/// Panics if the OS fails to create a thread, like [`std::thread::spawn`].
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let result = Arc::new(Slot::new());
    let result_ref = result.clone();
    thread::spawn(move || {
        let value = panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            debug!(%message, "spawned task panicked");
            TaskError::Panicked(message)
        });
        result_ref.put(value);
    });
    debug!("spawned task");

    JoinHandle::new(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
