//! # generator
//!
//! Rust generator library, backed by threads
//!
//! A generator body is an ordinary closure that hands values to its consumer
//! through [`Scope::yield_`]. The body runs on its own worker thread and is
//! suspended after every value until the consumer pulls the next one, so only
//! one side is ever running. The values are exposed as a plain [`Iterator`],
//! and through the [`Cursor`]/[`Enumerable`] begin/end interface.
//!
//! ```
//! use generator_seq::Gn;
//!
//! let fib = Gn::sequence(|mut s| {
//!     let (mut a, mut b) = (0u64, 1u64);
//!     loop {
//!         s.yield_(a);
//!         (a, b) = (b, a + b);
//!     }
//! });
//!
//! // the worker of the unfinished body is cancelled and joined on drop
//! let v: Vec<u64> = fib.iter().take(8).collect();
//! assert_eq!(v, [0, 1, 1, 2, 3, 5, 8, 13]);
//! ```
//!
//! A panic inside the body is resumed on the consumer side, at the pull that
//! would have returned the next value.
//!

#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod builder;
mod controller;
mod gen_impl;
mod rt;
mod scope;
mod sequence;

pub use crate::builder::{Builder, DEFAULT_STACK_SIZE};
pub use crate::gen_impl::{Generator, Gn};
pub use crate::rt::{Error, Payload};
pub use crate::scope::Scope;
pub use crate::sequence::{Cursor, Enumerable, Sequence};
