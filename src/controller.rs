//! # generator controller
//!
//! the shared state between one generator worker and its consumer
//!
//! exactly one side is outside a wait on the condvar at any time, the
//! `status` field names which one is allowed to run
//!

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::builder::Builder;
use crate::gen_impl::gen_wrapper;
use crate::rt::{usage_fault, Error, Payload};
use crate::scope::Scope;

/// which side of the handshake is running
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Status {
    /// no worker has been started yet
    Uninitialized,
    /// the generator body is running
    ProducerActive,
    /// a value (or nothing) is ready for the consumer
    ConsumerActive,
    /// terminal, the body returned, failed or was cancelled
    Finished,
}

struct State<T> {
    status: Status,
    // the single in-flight value
    value: Option<T>,
    // captured body panic, handed to the consumer once
    failure: Option<Payload>,
    // set only when the consumer abandoned the generator
    cancelled: bool,
    worker: Option<JoinHandle<()>>,
}

/// `Controller`
pub(crate) struct Controller<T> {
    state: Mutex<State<T>>,
    cond: Condvar,
}

impl<T> Controller<T> {
    pub fn new() -> Self {
        Controller {
            state: Mutex::new(State {
                status: Status::Uninitialized,
                value: None,
                failure: None,
                cancelled: false,
                worker: None,
            }),
            cond: Condvar::new(),
        }
    }

    // no user code runs under the lock, so a poisoned lock is still consistent
    #[inline]
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn wait_while<'a>(
        &self,
        guard: MutexGuard<'a, State<T>>,
        status: Status,
    ) -> MutexGuard<'a, State<T>> {
        self.cond
            .wait_while(guard, |s| s.status == status)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// start the worker running `f` and wait for its first value
    ///
    /// a failure raised before the first yield is returned here
    pub fn initialize<F>(self: &Arc<Self>, builder: &Builder, f: F) -> Result<(), Payload>
    where
        F: FnOnce(Scope<T>) + Send + 'static,
        T: Send + 'static,
    {
        let mut state = self.lock();
        if state.status != Status::Uninitialized {
            drop(state);
            usage_fault(Error::AlreadyInitialized);
        }

        // the worker blocks in its prologue until we release the lock below
        let ctrl = self.clone();
        match builder.spawn(move || gen_wrapper(ctrl, f)) {
            Ok(handle) => state.worker = Some(handle),
            Err(e) => {
                error!("failed to spawn generator worker: {e}");
                state.status = Status::Finished;
                self.cond.notify_all();
                return Err(Box::new(Error::SpawnErr));
            }
        }

        state.status = Status::ProducerActive;
        self.cond.notify_all();

        let mut state = self.wait_while(state, Status::ProducerActive);
        state.failure.take().map_or(Ok(()), Err)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.lock().status != Status::Uninitialized
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.lock().status == Status::Finished
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// move the pending value out
    ///
    /// returns `None` when the worker finished without a value
    pub fn await_value(&self) -> Option<T> {
        let state = self.lock();
        if state.status == Status::Uninitialized {
            drop(state);
            usage_fault(Error::NotInitialized);
        }

        let mut state = self.wait_while(state, Status::ProducerActive);
        state.value.take()
    }

    /// resume the worker and wait until it yields again or finishes
    pub fn continue_yielding(&self) -> Result<(), Payload> {
        let mut state = self.lock();
        let status = state.status;
        match status {
            Status::Uninitialized => {
                drop(state);
                usage_fault(Error::NotInitialized);
            }
            Status::Finished => return state.failure.take().map_or(Ok(()), Err),
            Status::ProducerActive | Status::ConsumerActive => {}
        }

        state.status = Status::ProducerActive;
        self.cond.notify_all();

        let mut state = self.wait_while(state, Status::ProducerActive);
        state.failure.take().map_or(Ok(()), Err)
    }

    /// force an abandoned generator into `Finished`
    ///
    /// a worker suspended in a yield wakes up into the cancel path
    pub fn cancel(&self) {
        let mut state = self.wait_while(self.lock(), Status::ProducerActive);
        let status = state.status;
        match status {
            Status::Finished => return,
            Status::Uninitialized => {}
            Status::ProducerActive | Status::ConsumerActive => {
                debug!("cancel the abandoned generator");
                state.cancelled = true;
            }
        }
        state.status = Status::Finished;
        self.cond.notify_all();
    }

    /// wait for the worker thread to exit
    ///
    /// only called by the consumer, the worker never owns its own generator
    pub fn join(&self) {
        let worker = self.lock().worker.take();
        if let Some(handle) = worker {
            if handle.join().is_err() {
                error!("generator worker panicked outside the generator body");
            }
        }
    }

    /// hand a value to the consumer and wait to be resumed
    ///
    /// returns `Error::Cancel` if the generator is resumed into cancellation
    pub fn pass_value_to_caller(&self, v: T) -> Result<(), Error> {
        let mut state = self.lock();
        if state.status == Status::Finished {
            return Err(Error::Cancel);
        }

        state.value = Some(v);
        state.status = Status::ConsumerActive;
        self.cond.notify_all();

        let state = self.wait_while(state, Status::ConsumerActive);
        if state.cancelled {
            return Err(Error::Cancel);
        }
        Ok(())
    }

    /// keep the body failure for the consumer's next resume
    pub fn pass_failure_to_caller(&self, cause: Payload) {
        let mut state = self.lock();
        state.failure = Some(cause);
        self.cond.notify_all();
    }

    pub fn pass_finished_to_caller(&self) {
        let mut state = self.lock();
        state.status = Status::Finished;
        self.cond.notify_all();
    }

    /// the worker prologue, wait for the first resume
    ///
    /// returns false if the generator was finished before it ever ran
    pub fn wait_for_resume(&self) -> bool {
        let state = self
            .cond
            .wait_while(self.lock(), |s| {
                matches!(s.status, Status::Uninitialized | Status::ConsumerActive)
            })
            .unwrap_or_else(PoisonError::into_inner);
        state.status == Status::ProducerActive
    }
}
