//! # generator
//!
//! Rust generator implementation
//!

use std::fmt;
use std::iter::FusedIterator;
use std::panic;
use std::sync::Arc;

use crate::builder::Builder;
use crate::controller::Controller;
use crate::rt::{is_cancel, Payload};
use crate::scope::Scope;
use crate::sequence::Sequence;

type Body<T> = Box<dyn FnOnce(Scope<T>) + Send + 'static>;

/// Generator helper
pub struct Gn {
    _priv: (),
}

impl Gn {
    /// create a scoped generator with default stack size
    ///
    /// ```
    /// use generator_seq::Gn;
    ///
    /// let g = Gn::new_scoped(|mut s| {
    ///     s.yield_(-1);
    ///     for i in 0..=6 {
    ///         s.yield_(i);
    ///     }
    /// });
    /// assert_eq!(g.collect::<Vec<_>>(), [-1, 0, 1, 2, 3, 4, 5, 6]);
    /// ```
    pub fn new_scoped<T, F>(f: F) -> Generator<T>
    where
        F: FnOnce(Scope<T>) + Send + 'static,
        T: Send + 'static,
    {
        Builder::new().generator(f)
    }

    /// create a scoped generator with specified stack size
    pub fn new_scoped_opt<T, F>(size: usize, f: F) -> Generator<T>
    where
        F: FnOnce(Scope<T>) + Send + 'static,
        T: Send + 'static,
    {
        Builder::new().stack_size(size).generator(f)
    }

    /// create a re-invokable sequence, every iteration runs `f` again
    pub fn sequence<T, F>(f: F) -> Sequence<T>
    where
        F: Fn(Scope<T>) + Send + Sync + 'static,
        T: Send + 'static,
    {
        Builder::new().sequence(f)
    }
}

/// the generator type
///
/// a single pass pull cursor over the values yielded by one invocation of a
/// generator body. the worker thread is spawned on the first pull, and a
/// generator dropped before it is exhausted cancels and joins its worker
pub struct Generator<T> {
    // shared with the worker, `None` once this is the end of the sequence
    ctrl: Option<Arc<Controller<T>>>,
    // the not yet started body
    start: Option<(Builder, Body<T>)>,
    // the most recently delivered value
    current: Option<T>,
}

impl<T> Generator<T> {
    /// the end of sequence sentinel
    pub fn end() -> Self {
        Generator {
            ctrl: None,
            start: None,
            current: None,
        }
    }

    /// is finished
    #[inline]
    pub fn is_done(&self) -> bool {
        self.ctrl.is_none()
    }

    /// check if the worker was already started
    ///
    /// an ended generator, including the [`Generator::end`] sentinel, has
    /// nothing left to start and reports `true`
    #[inline]
    pub fn is_started(&self) -> bool {
        self.ctrl.as_ref().map_or(true, |ctrl| ctrl.is_initialized())
    }

    /// the most recently delivered value
    ///
    /// `None` before the first pull, at the end, or after the value was
    /// taken by [`Iterator::next`]
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

impl<T: Send + 'static> Generator<T> {
    pub(crate) fn new(builder: Builder, f: Body<T>) -> Self {
        Generator {
            ctrl: Some(Arc::new(Controller::new())),
            start: Some((builder, f)),
            current: None,
        }
    }

    /// advance to the next value, returning a body failure as a value
    ///
    /// the first call starts the worker. once the body is finished the
    /// generator becomes the end sentinel, further calls do nothing
    pub fn try_increment(&mut self) -> Result<(), Payload> {
        let ctrl = match self.ctrl {
            Some(ref ctrl) => ctrl.clone(),
            None => {
                self.current = None;
                return Ok(());
            }
        };

        let resumed = match self.start.take() {
            Some((builder, f)) => ctrl.initialize(&builder, f),
            None => ctrl.continue_yielding(),
        };

        if ctrl.is_finished() {
            self.current = None;
            self.ctrl = None;
            ctrl.join();
        } else {
            self.current = ctrl.await_value();
        }
        resumed
    }

    /// advance to the next value
    ///
    /// a panic raised by the generator body is resumed here, unmodified
    pub fn increment(&mut self) {
        if let Err(cause) = self.try_increment() {
            panic::resume_unwind(cause);
        }
    }

    /// pull the next value, returning a body failure as a value
    pub fn try_next(&mut self) -> Result<Option<T>, Payload> {
        if self.current.is_none() {
            self.try_increment()?;
        }
        Ok(self.current.take())
    }
}

impl<T> Drop for Generator<T> {
    fn drop(&mut self) {
        let ctrl = match self.ctrl.take() {
            Some(ctrl) => ctrl,
            None => return,
        };

        if !ctrl.is_initialized() {
            // not started yet, just drop the body
            return;
        }

        warn!("generator is not done while drop");
        ctrl.cancel();
        ctrl.join();
    }
}

impl<T: Send + 'static> Iterator for Generator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.current.is_none() {
            self.increment();
        }
        self.current.take()
    }
}

impl<T: Send + 'static> FusedIterator for Generator<T> {}

impl<T> PartialEq for Generator<T> {
    /// identity of the underlying invocation, all ends are equal
    fn eq(&self, other: &Self) -> bool {
        match (&self.ctrl, &other.ctrl) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Eq for Generator<T> {}

impl<T> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Generator<{}> {{ done: {} }}",
            std::any::type_name::<T>(),
            self.is_done()
        )
    }
}

// the worker thread entry
//
// runs the body between the prologue and the epilogue, every exit path of
// the body ends with the controller finished
pub(crate) fn gen_wrapper<T, F>(ctrl: Arc<Controller<T>>, f: F)
where
    F: FnOnce(Scope<T>),
{
    trace!("generator worker starting");

    if ctrl.wait_for_resume() {
        let scope = Scope::new(ctrl.clone());
        if let Err(cause) = panic::catch_unwind(panic::AssertUnwindSafe(move || f(scope))) {
            // cancel is not an error at all, ignore it
            if !is_cancel(&cause) {
                error!("set panicked inside generator");
                ctrl.pass_failure_to_caller(cause);
            }
        }
    }

    ctrl.pass_finished_to_caller();
    trace!("generator worker exiting");
}
