use std::{
    fmt, mem,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, OnceLock,
    },
};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::{Error, InvalidHandle, UniqueFuture};

/// Cloneable, memoizing handle over a single-owner [`UniqueFuture`].
///
/// All clones share one state. The first [`get`](SharedFuture::get) from
/// any clone consumes the underlying future; its outcome, success or
/// failure, is cached and handed out by reference to every later caller.
///
/// A handle built from an invalid future (or via [`SharedFuture::invalid`])
/// has no state: [`valid`](SharedFuture::valid) is false and every other
/// operation reports [`InvalidHandle`].
pub struct SharedFuture<F: UniqueFuture> {
    state: Option<Arc<State<F>>>,
}

type Outcome<F> = Result<<F as UniqueFuture>::Output, <F as UniqueFuture>::Error>;

struct State<F: UniqueFuture> {
    source: RwLock<Source<F>>,
    /// Held for the whole consuming retrieval.
    transition: Mutex<()>,
    /// Written once, under `transition`.
    outcome: OnceLock<Outcome<F>>,
    /// Some holder has seen the underlying future complete.
    completed: AtomicBool,
}

enum Source<F> {
    Pending(F),
    /// Moved out by the holder currently inside `F::get`.
    Retrieving,
    /// The outcome is in `State::outcome`.
    Ready,
    /// `F::get` unwound; no outcome will ever be stored.
    Abandoned,
}

impl<F: UniqueFuture> SharedFuture<F> {
    pub fn new(future: F) -> Self {
        if !future.is_valid() {
            return Self::invalid();
        }
        Self {
            state: Some(Arc::new(State {
                source: RwLock::new(Source::Pending(future)),
                transition: Mutex::new(()),
                outcome: OnceLock::new(),
                completed: AtomicBool::new(false),
            })),
        }
    }

    /// A handle that refers to no state.
    pub fn invalid() -> Self {
        Self { state: None }
    }

    pub fn valid(&self) -> bool {
        self.state.is_some()
    }

    fn state(&self) -> Result<&State<F>, InvalidHandle> {
        self.state.as_deref().ok_or(InvalidHandle)
    }

    /// Whether [`get`](SharedFuture::get) would return without blocking.
    ///
    /// Never consumes the underlying future; while it is pending the
    /// question is forwarded to it.
    pub fn is_ready(&self) -> Result<bool, InvalidHandle> {
        let state = self.state()?;
        if state.outcome.get().is_some() {
            return Ok(true);
        }
        // recursive read does not queue behind a pending `get`
        let ready = match &*state.source.read_recursive() {
            Source::Pending(future) => {
                let ready = future.is_ready();
                if ready {
                    state.completed.store(true, Ordering::Release);
                }
                ready
            }
            Source::Retrieving => state.completed.load(Ordering::Acquire),
            Source::Ready | Source::Abandoned => true,
        };
        Ok(ready)
    }

    /// Blocks until the underlying future has completed.
    ///
    /// Does not retrieve the value, so it may be called any number of times
    /// from any clone. Returns immediately once the outcome is cached.
    pub fn wait(&self) -> Result<(), InvalidHandle> {
        let state = self.state()?;
        if state.outcome.get().is_some() {
            return Ok(());
        }
        match &*state.source.read() {
            Source::Pending(future) => {
                future.wait();
                state.completed.store(true, Ordering::Release);
                return Ok(());
            }
            Source::Retrieving => {}
            Source::Ready | Source::Abandoned => return Ok(()),
        }
        // Another holder is inside `F::get` and keeps `transition` locked until it settles.
        drop(state.transition.lock());
        Ok(())
    }

    /// Returns the outcome of the underlying future, retrieving it first
    /// if no holder has done so yet.
    ///
    /// Concurrent callers block until the single retrieval settles and then
    /// all observe the same cached outcome.
    pub fn get(&self) -> Result<&F::Output, Error<&F::Error>> {
        let state = self.state()?;
        if let Some(outcome) = state.outcome.get() {
            return lift(outcome);
        }

        let _transition = state.transition.lock();
        if let Some(outcome) = state.outcome.get() {
            return lift(outcome);
        }

        let future = {
            let mut source = state.source.write();
            if let Source::Pending(future) = &*source {
                if future.is_ready() {
                    state.completed.store(true, Ordering::Release);
                }
            }
            match mem::replace(&mut *source, Source::Retrieving) {
                Source::Pending(future) => future,
                other => {
                    *source = other;
                    return Err(Error::Abandoned);
                }
            }
        };

        let guard = AbandonOnUnwind {
            source: &state.source,
        };
        debug!("retrieving value from underlying future");
        let outcome = state.outcome.get_or_init(|| future.get());
        mem::forget(guard);
        *state.source.write() = Source::Ready;
        trace!(ok = outcome.is_ok(), "shared future is ready");

        lift(outcome)
    }

    /// The cached outcome, if the underlying future has already been retrieved.
    ///
    /// Never blocks and never triggers retrieval. Invalid handles yield `None`.
    pub fn peek(&self) -> Option<Result<&F::Output, &F::Error>> {
        let outcome = self.state.as_ref()?.outcome.get()?;
        Some(outcome.as_ref())
    }

    /// Whether both handles refer to the same state. Invalid handles never do.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (Some(this), Some(other)) => Arc::ptr_eq(this, other),
            _ => false,
        }
    }
}

fn lift<T, E>(outcome: &Result<T, E>) -> Result<&T, Error<&E>> {
    outcome.as_ref().map_err(Error::Underlying)
}

/// Marks the source abandoned if `F::get` unwinds.
struct AbandonOnUnwind<'a, F> {
    source: &'a RwLock<Source<F>>,
}

impl<F> Drop for AbandonOnUnwind<'_, F> {
    fn drop(&mut self) {
        warn!("underlying future panicked during retrieval, abandoning shared state");
        *self.source.write() = Source::Abandoned;
    }
}

impl<F: UniqueFuture> Clone for SharedFuture<F> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<F: UniqueFuture> Default for SharedFuture<F> {
    fn default() -> Self {
        Self::invalid()
    }
}

impl<F: UniqueFuture> From<F> for SharedFuture<F> {
    fn from(future: F) -> Self {
        Self::new(future)
    }
}

impl<F: UniqueFuture> fmt::Debug for SharedFuture<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match &self.state {
            None => "Invalid",
            Some(state) if state.outcome.get().is_some() => "Ready",
            Some(state) => match &*state.source.read_recursive() {
                Source::Pending(_) => "Pending",
                Source::Retrieving => "Retrieving",
                Source::Ready => "Ready",
                Source::Abandoned => "Abandoned",
            },
        };
        f.debug_struct("SharedFuture").field("state", &tag).finish()
    }
}
