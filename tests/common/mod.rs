#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use shared_future::{promise, JoinHandle, Promise, SharedFuture, TaskError, UniqueFuture};

/// Number of calls forwarded to the wrapped future.
#[derive(Default)]
pub struct Calls {
    pub is_ready: AtomicUsize,
    pub wait: AtomicUsize,
    pub get: AtomicUsize,
}

impl Calls {
    pub fn is_ready(&self) -> usize {
        self.is_ready.load(Ordering::SeqCst)
    }

    pub fn wait(&self) -> usize {
        self.wait.load(Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }
}

/// Forwards to `F` and counts every call.
pub struct Counted<F> {
    inner: F,
    calls: Arc<Calls>,
}

pub fn counted<F>(inner: F) -> (Counted<F>, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    (
        Counted {
            inner,
            calls: calls.clone(),
        },
        calls,
    )
}

impl<F: UniqueFuture> UniqueFuture for Counted<F> {
    type Output = F::Output;
    type Error = F::Error;

    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    fn is_ready(&self) -> bool {
        self.calls.is_ready.fetch_add(1, Ordering::SeqCst);
        self.inner.is_ready()
    }

    fn wait(&self) {
        self.calls.wait.fetch_add(1, Ordering::SeqCst);
        self.inner.wait()
    }

    fn get(self) -> Result<F::Output, F::Error> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.inner.get()
    }
}

/// Always ready, but panics when retrieved.
pub struct Exploding;

impl UniqueFuture for Exploding {
    type Output = u32;
    type Error = TaskError;

    fn is_valid(&self) -> bool {
        true
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn wait(&self) {}

    fn get(self) -> Result<u32, TaskError> {
        panic!("exploding future")
    }
}

/// Reports ready from the start, but `get` blocks until released.
/// Without a value, `get` panics once released.
pub struct Gated<T> {
    release: JoinHandle<()>,
    value: Option<T>,
}

pub fn gated<T>(value: Option<T>) -> (Promise<()>, Gated<T>) {
    let (release, handle) = promise();
    (
        release,
        Gated {
            release: handle,
            value,
        },
    )
}

impl<T> UniqueFuture for Gated<T> {
    type Output = T;
    type Error = TaskError;

    fn is_valid(&self) -> bool {
        true
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn wait(&self) {}

    fn get(self) -> Result<T, TaskError> {
        let _ = self.release.get();
        match self.value {
            Some(value) => Ok(value),
            None => panic!("gated future released without a value"),
        }
    }
}

/// Spins until some holder has moved the source out and is inside its `get`.
pub fn until_retrieving<F>(shared: &SharedFuture<F>)
where
    F: UniqueFuture,
{
    while !format!("{shared:?}").contains("Retrieving") {
        thread::sleep(Duration::from_millis(1));
    }
}
