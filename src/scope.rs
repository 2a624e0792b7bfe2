//! # yield
//!
//! generator yield implementation
//!

use std::marker::PhantomData;
use std::panic;
use std::sync::Arc;
use std::thread;

use crate::controller::Controller;
use crate::rt::Error;

/// passed in scope type
///
/// the generator body receives it and calls [`Scope::yield_`] to hand
/// values to the consumer. it stays on the worker thread that runs the body
pub struct Scope<T> {
    ctrl: Arc<Controller<T>>,
    // only the worker thread may yield
    _not_send: PhantomData<*mut ()>,
}

impl<T> Scope<T> {
    /// create a new scope object
    pub(crate) fn new(ctrl: Arc<Controller<T>>) -> Self {
        Scope {
            ctrl,
            _not_send: PhantomData,
        }
    }

    /// yield a value and suspend until the consumer asks for the next one
    ///
    /// if the consumer abandoned the generator meanwhile, this unwinds the
    /// generator body so that no further values are produced. the unwinding
    /// is silent and never reported as a failure
    #[inline]
    pub fn yield_(&mut self, v: T) {
        if let Err(e) = self.try_yield(v) {
            unwind_cancel(e);
        }
    }

    /// yield a value, reporting cancellation instead of unwinding
    ///
    /// returns `Err(Error::Cancel)` once the consumer abandoned the generator,
    /// the value is dropped in that case. the body should return promptly
    #[inline]
    pub fn try_yield(&mut self, v: T) -> Result<(), Error> {
        self.ctrl.pass_value_to_caller(v)
    }

    /// `yield_from`
    ///
    /// yield every item of `iter` in order, stop at cancellation
    pub fn yield_from<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for v in iter {
            if let Err(e) = self.try_yield(v) {
                return unwind_cancel(e);
            }
        }
    }

    /// check if the consumer abandoned this generator
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.ctrl.is_cancelled()
    }
}

#[inline]
#[cold]
fn unwind_cancel(e: Error) {
    // a drop glue that yields while we already unwind
    if thread::panicking() {
        return;
    }
    panic::resume_unwind(Box::new(e));
}
