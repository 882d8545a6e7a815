use parking_lot::{Condvar, Mutex};

/// User must put the value exactly once and
/// take the value no more than once.
enum SlotState<T> {
    Initial,
    Ready(T),
    Taken,
}

/// One-shot cell shared between the thread producing a value
/// and the handle consuming it.
pub(crate) struct Slot<T> {
    state: Mutex<SlotState<T>>,
    filled: Condvar,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Initial),
            filled: Condvar::new(),
        }
    }

    /// Store provided value.
    /// Every thread blocked in [`Slot::wait`] or [`Slot::take`] is woken.
    pub(crate) fn put(&self, value: T) {
        let mut state = self.state.lock();
        let old = std::mem::replace(&mut *state, SlotState::Ready(value));
        match old {
            SlotState::Initial => {}
            SlotState::Ready(_) | SlotState::Taken => {
                panic!("putting value twice is contract violation")
            }
        }
        drop(state);
        self.filled.notify_all();
    }

    /// Blocks until the value is put, then moves it out.
    pub(crate) fn take(&self) -> T {
        let mut state = self.state.lock();
        while matches!(*state, SlotState::Initial) {
            self.filled.wait(&mut state);
        }
        match std::mem::replace(&mut *state, SlotState::Taken) {
            SlotState::Ready(value) => value,
            SlotState::Initial | SlotState::Taken => {
                panic!("taking value twice is contract violation")
            }
        }
    }

    /// Blocks until the value is put. Does not take it.
    pub(crate) fn wait(&self) {
        let mut state = self.state.lock();
        while matches!(*state, SlotState::Initial) {
            self.filled.wait(&mut state);
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        !matches!(*self.state.lock(), SlotState::Initial)
    }
}
