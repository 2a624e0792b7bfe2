//! # generator builder
//!
//! worker thread configuration for generators and sequences
//!

use std::io;
use std::thread::{self, JoinHandle};

use crate::gen_impl::Generator;
use crate::scope::Scope;
use crate::sequence::Sequence;

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        /// default worker stack size, in bytes
        pub const DEFAULT_STACK_SIZE: usize = 0x20_0000;
    } else {
        /// default worker stack size, in bytes
        pub const DEFAULT_STACK_SIZE: usize = 0x10_0000;
    }
}

/// A builder used to configure the worker thread of a generator.
///
/// Nothing is spawned by the builder itself. The worker is only started
/// when the resulting generator is first pulled.
///
/// ```
/// use generator_seq::Builder;
///
/// let seq = Builder::new()
///     .name("squares")
///     .stack_size(64 * 1024)
///     .sequence(|mut s| {
///         for i in 0..4u32 {
///             s.yield_(i * i);
///         }
///     });
///
/// assert_eq!(seq.iter().collect::<Vec<_>>(), [0, 1, 4, 9]);
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    name: Option<String>,
    stack_size: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            name: None,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl Builder {
    /// create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// set the name of the worker thread
    pub fn name<N: Into<String>>(self, name: N) -> Self {
        Builder {
            name: Some(name.into()),
            ..self
        }
    }

    /// set the stack size of the worker thread, in bytes
    #[inline]
    pub fn stack_size(self, stack_size: usize) -> Self {
        Builder { stack_size, ..self }
    }

    /// create a one-shot generator running `f` on a configured worker
    pub fn generator<T, F>(self, f: F) -> Generator<T>
    where
        F: FnOnce(Scope<T>) + Send + 'static,
        T: Send + 'static,
    {
        Generator::new(self, Box::new(f))
    }

    /// create a re-invokable sequence running `f` on configured workers
    pub fn sequence<T, F>(self, f: F) -> Sequence<T>
    where
        F: Fn(Scope<T>) + Send + Sync + 'static,
        T: Send + 'static,
    {
        Sequence::with_builder(self, f)
    }

    pub(crate) fn spawn<F>(&self, f: F) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut builder = thread::Builder::new().stack_size(self.stack_size);
        if let Some(name) = self.name.clone() {
            builder = builder.name(name);
        }
        builder.spawn(f)
    }
}
